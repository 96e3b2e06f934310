//! Corpus loading

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::SearchError;

/// The full text being searched
///
/// Loaded once and never mutated. Offsets handed out by the indexes are byte
/// offsets into [`Corpus::text`].
#[derive(Debug, Clone)]
pub struct Corpus {
    text: String,
    path: Option<PathBuf>,
}

impl Corpus {
    /// Read the whole file as UTF-8 text
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SearchError> {
        let path = path.as_ref();
        debug!(?path, "Corpus::load: called");
        let text = fs::read_to_string(path).map_err(|source| SearchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), bytes = text.len(), "Loaded corpus");
        Ok(Self {
            text,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap text that is already in memory
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            path: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// File the corpus was read from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Copy with ASCII letters folded to lowercase
    ///
    /// Only ASCII bytes change, so every offset in the copy is also a valid
    /// offset (and char boundary) in the original.
    pub fn lowercased(&self) -> Vec<u8> {
        self.text.as_bytes().to_ascii_lowercase()
    }

    /// Number of non-ASCII characters that have a case
    ///
    /// Those letters are not case folded, so queries containing them only
    /// match with the exact case. Non-ASCII punctuation (curly quotes,
    /// dashes) has no case and is not counted.
    pub fn non_ascii_letter_count(&self) -> usize {
        self.text
            .chars()
            .filter(|c| !c.is_ascii() && (c.is_uppercase() || c.is_lowercase()))
            .count()
    }
}
