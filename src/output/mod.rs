// Output — terminal display, artifact files, renderers and the run report.

pub mod artifacts;
pub mod render;
pub mod report;
pub mod terminal;

/// Join at most `max_items` words with ", ", appending "..." when some were left out.
pub fn preview_words<S: AsRef<str>>(words: &[S], max_items: usize) -> String {
    let shown: Vec<&str> = words.iter().take(max_items).map(|w| w.as_ref()).collect();
    let mut out = shown.join(", ");
    if words.len() > max_items {
        out.push_str(", ...");
    }
    out
}
