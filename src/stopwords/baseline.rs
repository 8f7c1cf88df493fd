// Baseline stopwords — what a run starts from before any promotion.
//
// French + English general-purpose lists, a handful of OCR/metadata artifacts
// that show up in the digitized archive, and whatever earlier runs persisted
// to the extra list.

use std::path::Path;

use anyhow::Result;
use stop_words::{get, LANGUAGE};
use tracing::info;

use super::store;
use super::StopwordSet;

/// Short institutional and OCR artifact tokens seen in the archive scans.
pub const MANUAL_STOPWORDS: &[&str] = &[
    "kb_jb838", "kb", "jb838", "ag", "tel", "tél", "pr", "ec", "ea", "pf", "pts", "4", "1", "2",
    "3",
];

/// The language lists only (French + English), lowercased.
pub fn language_stopwords() -> StopwordSet {
    let mut set = StopwordSet::new();
    for lang in [LANGUAGE::French, LANGUAGE::English] {
        set.extend(get(lang).iter());
    }
    set
}

/// Build the full baseline: language lists, manual exceptions, and the
/// previously persisted extra list at `extra_path` if it exists.
pub fn load_baseline(extra_path: &Path) -> Result<StopwordSet> {
    let mut set = language_stopwords();
    let language_count = set.len();
    set.extend(MANUAL_STOPWORDS.iter());

    let extra = if extra_path.exists() {
        store::read_word_list(extra_path)?
    } else {
        Vec::new()
    };
    let extra_count = extra.len();
    set.extend(extra);

    info!(
        language = language_count,
        manual = MANUAL_STOPWORDS.len(),
        extra = extra_count,
        total = set.len(),
        "Built baseline stopword set"
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_lists_cover_french_and_english() {
        let set = language_stopwords();
        assert!(set.contains("le"));
        assert!(set.contains("the"));
    }

    #[test]
    fn test_baseline_without_extra_file() {
        let set = load_baseline(Path::new("/nonexistent/stopwords_extra.txt")).unwrap();
        for word in MANUAL_STOPWORDS {
            assert!(set.contains(word), "missing manual stopword {word}");
        }
    }
}
