// Frequency renderers — turn a cluster's filtered frequency distribution into
// an image-like artifact.
//
// The refinement core never depends on how rendering works; it only hands a
// ranked (token, count) list to whichever renderer is configured.

use anyhow::Result;
use serde::Serialize;

/// Renders a ranked frequency list to bytes.
pub trait FrequencyRenderer {
    /// File extension for the produced artifact (without the dot).
    fn extension(&self) -> &'static str;

    /// Render `freqs`, most frequent first. Never called with an empty list.
    fn render(&self, freqs: &[(&str, usize)]) -> Result<Vec<u8>>;
}

/// A simple word cloud as SVG: words laid out in rows, font size scaled by
/// the square root of relative frequency.
pub struct SvgCloudRenderer {
    pub width: u32,
    pub height: u32,
    pub max_words: usize,
    pub min_font: f64,
    pub max_font: f64,
}

impl Default for SvgCloudRenderer {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            max_words: 200,
            min_font: 10.0,
            max_font: 64.0,
        }
    }
}

const PALETTE: &[&str] = &["#1b4f72", "#7d3c98", "#117a65", "#b9770e", "#922b21", "#2e4053"];

impl FrequencyRenderer for SvgCloudRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, freqs: &[(&str, usize)]) -> Result<Vec<u8>> {
        let max_count = freqs.first().map(|(_, n)| *n).unwrap_or(1).max(1) as f64;
        let (w, h) = (self.width as f64, self.height as f64);

        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">\n\
             <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n",
            self.width, self.height, self.width, self.height
        );

        let mut x = 0.0;
        let mut row_top = 0.0;
        let mut row_baseline = 0.0;
        let mut row_height = 0.0;
        let mut row_open = false;
        for (i, (word, count)) in freqs.iter().take(self.max_words).enumerate() {
            let scale = (*count as f64 / max_count).sqrt();
            let font = self.min_font + (self.max_font - self.min_font) * scale;
            // Rough advance width for a proportional sans-serif face
            let word_width = word.chars().count() as f64 * font * 0.6;

            if row_open && x + word_width > w {
                row_top += row_height;
                x = 0.0;
                row_open = false;
            }
            if !row_open {
                // Words arrive largest first, so the row's first word sets its height
                row_baseline = row_top + font;
                row_height = font * 1.2;
                row_open = true;
            }
            if row_baseline > h {
                break;
            }

            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"{:.1}\" fill=\"{}\">{}</text>\n",
                x,
                row_baseline,
                font,
                PALETTE[i % PALETTE.len()],
                escape_xml(word)
            ));
            x += word_width + font * 0.3;
        }

        svg.push_str("</svg>\n");
        Ok(svg.into_bytes())
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Writes the distribution as a JSON array of `{token, count}` objects.
pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonEntry<'a> {
    token: &'a str,
    count: usize,
}

impl FrequencyRenderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, freqs: &[(&str, usize)]) -> Result<Vec<u8>> {
        let entries: Vec<JsonEntry<'_>> = freqs
            .iter()
            .map(|&(token, count)| JsonEntry { token, count })
            .collect();
        Ok(serde_json::to_vec_pretty(&entries)?)
    }
}
