// Newline-delimited word lists on disk.

use std::path::Path;

use anyhow::{Context, Result};

use super::StopwordSet;

/// Read a word list: one token per line, surrounding whitespace trimmed,
/// blank lines skipped.
pub fn read_word_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read word list {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect())
}

/// Write words to `path`, sorted, one per line (trailing newline included).
pub fn write_word_list<'a, I>(path: &Path, words: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut words: Vec<&str> = words.into_iter().collect();
    words.sort_unstable();
    words.dedup();

    let mut content = String::new();
    for word in &words {
        content.push_str(word);
        content.push('\n');
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write word list {}", path.display()))?;
    Ok(words.len())
}

/// Persist a whole stopword set.
pub fn write_stopword_set(path: &Path, set: &StopwordSet) -> Result<usize> {
    write_word_list(path, set.sorted())
}
