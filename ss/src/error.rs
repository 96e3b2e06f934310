//! Search error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading and indexing the corpus
///
/// All of these are fatal at startup. Query-time problems never surface as
/// errors: an unresolved title degrades to an empty title and snippets are
/// clamped to the corpus bounds.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Failed to read corpus {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not find table of contents (expected '{heading}' ... '{terminal}')")]
    StructureNotFound { heading: String, terminal: String },

    #[error("Corpus contains {count} non-ASCII letters; case folding would not be exact")]
    NonAscii { count: usize },

    #[error("Invalid table of contents pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_message_names_path() {
        let err = SearchError::Io {
            path: PathBuf::from("/nope/completeworks.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };

        let msg = err.to_string();
        assert!(msg.contains("/nope/completeworks.txt"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_structure_not_found_message() {
        let err = SearchError::StructureNotFound {
            heading: "Contents".to_string(),
            terminal: "THE SONNETS".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("table of contents"));
        assert!(msg.contains("THE SONNETS"));
    }

    #[test]
    fn test_non_ascii_message() {
        let msg = SearchError::NonAscii { count: 7 }.to_string();
        assert!(msg.contains('7'));
    }
}
