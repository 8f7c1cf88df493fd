// Tokenizer/normalizer — turns raw document text into normalized tokens.
//
// Splitting and normalization are separate steps. Splitting is pluggable via
// the WordSplitter trait; normalization is fixed: lowercase, then strip every
// character outside the French-aware allowed set.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Every character that is NOT a lowercase ASCII letter, a French accented
/// letter, an apostrophe or a hyphen.
static STRIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zàâçéèêëîïôûùüÿñæœ'\-]").expect("strip pattern is a valid regex")
});

/// Splits raw text into word-like pieces before normalization.
pub trait WordSplitter {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Default splitter with Treebank-style boundaries: whitespace, bracketing
/// and sentence punctuation, a comma or colon unless a digit follows, and the
/// runs `--` and `...`.
///
/// Other symbols stay inside the word ("l'homme", "peut-être", "kb_jb838",
/// "12/03") and are left for normalization to strip.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationSplitter;

impl WordSplitter for PunctuationSplitter {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut pieces = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            let next = chars.peek().map(|&(_, n)| n);
            if is_word_boundary(c, next) {
                push_pieces(&mut pieces, &text[start..i]);
                start = i + c.len_utf8();
            }
        }
        push_pieces(&mut pieces, &text[start..]);
        pieces
    }
}

/// Push the non-empty parts of `piece` left after cutting at `--` and `...`.
fn push_pieces<'a>(pieces: &mut Vec<&'a str>, piece: &'a str) {
    pieces.extend(
        piece
            .split("--")
            .flat_map(|part| part.split("..."))
            .filter(|part| !part.is_empty()),
    );
}

fn is_word_boundary(c: char, next: Option<char>) -> bool {
    if c.is_whitespace() {
        return true;
    }
    match c {
        ';' | '@' | '#' | '$' | '%' | '&' | '?' | '!' | '(' | ')' | '[' | ']' | '{' | '}'
        | '<' | '>' | '"' => true,
        // "3,14" and "12:30" stay whole
        ',' | ':' => !next.is_some_and(|n| n.is_ascii_digit()),
        // Typographic quotes, dashes and ellipses are common in OCR'd French
        '«' | '»' | '“' | '”' | '—' | '–' | '…' => true,
        _ => false,
    }
}

/// Normalize a single raw word: lowercase, then strip disallowed characters.
///
/// Returns `None` when nothing survives stripping.
pub fn normalize(word: &str) -> Option<String> {
    let lower = word.to_lowercase();
    let stripped = STRIP_RE.replace_all(&lower, "");
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.into_owned())
    }
}

/// Full tokenizer: a word splitter followed by normalization.
#[derive(Debug, Clone)]
pub struct Tokenizer<S = PunctuationSplitter> {
    splitter: S,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            splitter: PunctuationSplitter,
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: WordSplitter> Tokenizer<S> {
    pub fn with_splitter(splitter: S) -> Self {
        Self { splitter }
    }

    /// Produce the ordered sequence of normalized tokens for `text`.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.splitter
            .split(text)
            .into_iter()
            .filter_map(normalize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_and_lowercases() {
        assert_eq!(normalize("Château!").as_deref(), Some("château"));
        assert_eq!(normalize("L'Œuvre").as_deref(), Some("l'œuvre"));
        assert_eq!(normalize("1954").as_deref(), None);
        assert_eq!(normalize("kb_jb838").as_deref(), Some("kbjb"));
    }

    #[test]
    fn test_tokenize_drops_punctuation_only_pieces() {
        let tok = Tokenizer::new();
        assert_eq!(
            tok.tokenize("Le chat, « noir » — 12 fois."),
            vec!["le", "chat", "noir", "fois"]
        );
    }

    #[test]
    fn test_tokenize_keeps_apostrophes_and_hyphens() {
        let tok = Tokenizer::new();
        assert_eq!(
            tok.tokenize("Aujourd'hui, peut-être."),
            vec!["aujourd'hui", "peut-être"]
        );
    }

    #[test]
    fn test_tokenize_keeps_symbols_inside_words() {
        let tok = Tokenizer::new();
        assert_eq!(tok.tokenize("kb_jb838 a/b"), vec!["kbjb", "ab"]);
        assert_eq!(
            tok.tokenize("kb_jb838 rapport 12/03 a*b"),
            vec!["kbjb", "rapport", "ab"]
        );
    }

    #[test]
    fn test_split_on_dash_and_ellipsis_runs() {
        assert_eq!(
            PunctuationSplitter.split("oui--non attendez...bien"),
            vec!["oui", "non", "attendez", "bien"]
        );
    }

    #[test]
    fn test_comma_before_digit_is_not_a_boundary() {
        assert_eq!(PunctuationSplitter.split("3,14 a,b"), vec!["3,14", "a", "b"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(Tokenizer::new().tokenize("").is_empty());
    }
}
