// Document store loader — reads the plain-text corpus directory.
//
// Files are decoded as UTF-8, falling back to Latin-1 for legacy OCR output.
// Latin-1 maps every byte to a code point, so the fallback itself never fails;
// only I/O errors propagate.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

/// Read every `*.txt` file in `dir`, keyed by file name.
pub fn load_documents(dir: &Path) -> Result<HashMap<String, String>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read document directory {}", dir.display()))?;

    let mut texts = HashMap::new();
    let mut fallbacks = 0usize;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let (text, used_fallback) = read_text(&path)?;
        if used_fallback {
            debug!(file = name, "Decoded as Latin-1");
            fallbacks += 1;
        }
        texts.insert(name.to_string(), text);
    }

    info!(
        documents = texts.len(),
        latin1_fallbacks = fallbacks,
        dir = %dir.display(),
        "Loaded document store"
    );
    Ok(texts)
}

/// Read one file, returning the text and whether the Latin-1 fallback was used.
pub fn read_text(path: &Path) -> Result<(String, bool)> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(decode_text(bytes))
}

/// Decode bytes as UTF-8, or as Latin-1 when that fails.
pub fn decode_text(bytes: Vec<u8>) -> (String, bool) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(err) => {
            let text = err.into_bytes().iter().map(|&b| b as char).collect();
            (text, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        let (text, fallback) = decode_text("été".as_bytes().to_vec());
        assert_eq!(text, "été");
        assert!(!fallback);
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // "été" in ISO-8859-1
        let (text, fallback) = decode_text(vec![0xE9, b't', 0xE9]);
        assert_eq!(text, "été");
        assert!(fallback);
    }
}
