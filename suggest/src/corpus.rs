//! Corpus loading.
//!
//! A corpus is plain UTF-8 text. Words are whitespace-separated tokens,
//! lowercased, kept in file order with duplicates intact.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, SuggestError};

/// Reads and tokenizes the corpus at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading corpus");

    let text = fs::read_to_string(path).map_err(|source| SuggestError::Corpus {
        path: path.to_path_buf(),
        source,
    })?;

    let words = tokenize(&text);
    info!(path = %path.display(), words = words.len(), "loaded corpus");
    Ok(words)
}

/// Splits `text` on Unicode whitespace and lowercases every token.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}
