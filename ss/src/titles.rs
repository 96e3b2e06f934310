//! Table-of-contents parsing
//!
//! The corpus opens with a contents listing bracketed by a fixed author line
//! plus heading and a terminal phrase. Each non-blank line between them is
//! the title of one work.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, info};

use crate::error::SearchError;

/// Phrases that bracket the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocMarkers {
    /// Byline preceding the contents heading
    pub author: String,

    /// Contents heading itself
    pub heading: String,

    /// Phrase the listing runs up to (its last occurrence in the corpus)
    pub terminal: String,
}

impl Default for TocMarkers {
    fn default() -> Self {
        Self {
            author: "by William Shakespeare".to_string(),
            heading: "Contents".to_string(),
            terminal: "THE SONNETS".to_string(),
        }
    }
}

impl TocMarkers {
    /// `{author}\s+{heading}\s+(anything){terminal}`
    ///
    /// The capture is greedy, so it runs up to the last occurrence of the
    /// terminal phrase.
    pub fn pattern(&self) -> Result<Regex, SearchError> {
        let source = format!(
            r"{}\s+{}\s+((?s:.*)){}",
            regex::escape(&self.author),
            regex::escape(&self.heading),
            regex::escape(&self.terminal)
        );
        Ok(Regex::new(&source)?)
    }
}

/// Titles in listing order, plus where the listing sits in the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOfContents {
    pub titles: Vec<String>,

    /// From the start of the author line to the end of the captured listing
    pub span: Range<usize>,
}

impl TableOfContents {
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Locate the contents listing and split it into titles
///
/// Only the first match of the marker pattern is used. Fails with
/// [`SearchError::StructureNotFound`] when the pattern does not match at all.
pub fn extract_titles(corpus: &str, markers: &TocMarkers) -> Result<TableOfContents, SearchError> {
    debug!(?markers, "extract_titles: called");
    let re = markers.pattern()?;

    let not_found = || SearchError::StructureNotFound {
        heading: markers.heading.clone(),
        terminal: markers.terminal.clone(),
    };
    let caps = re.captures(corpus).ok_or_else(not_found)?;
    let (whole, listing) = caps.get(0).zip(caps.get(1)).ok_or_else(not_found)?;

    let titles = split_titles(listing.as_str());
    info!(count = titles.len(), "Extracted titles from table of contents");

    Ok(TableOfContents {
        titles,
        span: whole.start()..listing.end(),
    })
}

fn split_titles(listing: &str) -> Vec<String> {
    listing
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOC: &str = "The Complete Works\n\nby William Shakespeare\n\n    Contents\n\n    Hamlet\n  \n    Macbeth\r\n\nTHE SONNETS\n\nbody text";

    #[test]
    fn test_extract_titles_in_order() {
        let toc = extract_titles(TOC, &TocMarkers::default()).unwrap();
        assert_eq!(toc.titles, vec!["Hamlet", "Macbeth"]);
    }

    #[test]
    fn test_span_covers_listing_not_terminal() {
        let toc = extract_titles(TOC, &TocMarkers::default()).unwrap();
        assert_eq!(&TOC[toc.span.start..toc.span.start + 2], "by");
        assert!(TOC[toc.span.end..].starts_with("THE SONNETS"));
    }

    #[test]
    fn test_missing_structure_is_error() {
        let err = extract_titles("no contents here", &TocMarkers::default()).unwrap_err();
        assert!(matches!(err, SearchError::StructureNotFound { .. }));
    }

    #[test]
    fn test_greedy_capture_runs_to_last_terminal() {
        let text = "by William Shakespeare\nContents\nTHE SONNETS\nOTHELLO\nTHE SONNETS\n";
        let toc = extract_titles(text, &TocMarkers::default()).unwrap();
        assert_eq!(toc.titles, vec!["THE SONNETS", "OTHELLO"]);
    }

    #[test]
    fn test_custom_markers_are_escaped() {
        let markers = TocMarkers {
            author: "by A. N. Other (ed.)".to_string(),
            heading: "Index".to_string(),
            terminal: "END*".to_string(),
        };
        let text = "by A. N. Other (ed.)\nIndex\n  One\n  Two\nEND*";
        let toc = extract_titles(text, &markers).unwrap();
        assert_eq!(toc.titles, vec!["One", "Two"]);
    }
}
