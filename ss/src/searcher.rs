//! Searcher aggregate and query engine

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::corpus::Corpus;
use crate::error::SearchError;
use crate::index::PositionIndex;
use crate::ranges::{RangeResolutionStrategy, RangeTable, ResolveContext, StrategyKind};
use crate::titles::{TableOfContents, TocMarkers, extract_titles};

/// Options for loading and querying
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Bytes of context on each side of a match
    #[serde(rename = "snippet-radius")]
    pub snippet_radius: usize,

    /// Fail the load instead of warning when the corpus has non-ASCII letters
    #[serde(rename = "strict-ascii")]
    pub strict_ascii: bool,

    /// How title content starts are located
    #[serde(rename = "range-strategy")]
    pub range_strategy: StrategyKind,

    /// Phrases bracketing the table of contents
    pub toc: TocMarkers,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            snippet_radius: crate::DEFAULT_SNIPPET_RADIUS,
            strict_ascii: false,
            range_strategy: StrategyKind::default(),
            toc: TocMarkers::default(),
        }
    }
}

/// A single search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Byte offset of the match in the corpus
    pub offset: usize,

    /// Owning title, empty when unknown
    pub title: String,

    /// Text around the match
    pub snippet: String,
}

/// Corpus, index, titles and title ranges, built once and then read-only
///
/// Share one instance behind an `Arc` with every request handler.
#[derive(Debug)]
pub struct Searcher {
    corpus: Corpus,
    index: PositionIndex,
    toc: TableOfContents,
    ranges: RangeTable,
    snippet_radius: usize,
}

impl Searcher {
    /// Read the corpus file and build everything
    pub fn load(path: impl AsRef<Path>, options: &SearchOptions) -> Result<Self, SearchError> {
        let corpus = Corpus::load(path)?;
        Self::from_corpus(corpus, options)
    }

    /// Build from an in-memory corpus with the configured strategy
    pub fn from_corpus(corpus: Corpus, options: &SearchOptions) -> Result<Self, SearchError> {
        let strategy = options.range_strategy.strategy();
        Self::with_strategy(corpus, options, strategy.as_ref())
    }

    /// Build from an in-memory corpus with a caller-supplied strategy
    pub fn with_strategy(
        corpus: Corpus,
        options: &SearchOptions,
        strategy: &dyn RangeResolutionStrategy,
    ) -> Result<Self, SearchError> {
        debug!(strategy = strategy.name(), ?options, "Searcher::with_strategy: called");

        let non_ascii = corpus.non_ascii_letter_count();
        if non_ascii > 0 {
            if options.strict_ascii {
                return Err(SearchError::NonAscii { count: non_ascii });
            }
            warn!(
                count = non_ascii,
                "Corpus has non-ASCII letters; matching on those letters is case-sensitive"
            );
        }

        let toc = extract_titles(corpus.text(), &options.toc)?;

        // The raw index is only needed to resolve ranges.
        let ranges = {
            let raw_index = PositionIndex::new(corpus.as_bytes());
            let ctx = ResolveContext {
                corpus: corpus.text(),
                raw_index: &raw_index,
            };
            strategy.resolve(&toc, &ctx)
        };
        if ranges.unresolved() > 0 {
            warn!(
                unresolved = ranges.unresolved(),
                total = ranges.len(),
                "Some titles have no content range"
            );
        }

        let index = PositionIndex::new(corpus.lowercased());

        info!(
            titles = toc.len(),
            bytes = corpus.len(),
            strategy = strategy.name(),
            "Searcher ready"
        );

        Ok(Self {
            corpus,
            index,
            toc,
            ranges,
            snippet_radius: options.snippet_radius,
        })
    }

    /// Case-insensitive substring search
    ///
    /// Results are in ascending offset order, as returned by the index.
    pub fn search(&self, query: &str) -> Vec<Match> {
        let offsets = self.lookup(query);
        debug!(%query, matches = offsets.len(), "Searcher::search");
        offsets
            .into_iter()
            .map(|offset| Match {
                offset,
                title: self.title_for(offset).to_string(),
                snippet: self.snippet(offset).to_string(),
            })
            .collect()
    }

    /// Like [`Searcher::search`] but without title attribution
    pub fn search_snippets(&self, query: &str) -> Vec<String> {
        self.lookup(query)
            .into_iter()
            .map(|offset| self.snippet(offset).to_string())
            .collect()
    }

    /// Match offsets for `query`, ignoring ASCII case
    pub fn lookup(&self, query: &str) -> Vec<usize> {
        let needle = query.to_ascii_lowercase();
        self.index.lookup(needle.as_bytes(), None)
    }

    /// Title owning `offset`, or `""` when it cannot be attributed
    pub fn title_for(&self, offset: usize) -> &str {
        self.ranges
            .owner(offset)
            .and_then(|i| self.toc.titles.get(i))
            .map_or("", String::as_str)
    }

    /// Corpus text within `snippet_radius` bytes of `offset`
    ///
    /// Clamped to the corpus bounds and widened to the nearest char
    /// boundaries, so it never panics near either end.
    pub fn snippet(&self, offset: usize) -> &str {
        let text = self.corpus.text();
        let mut start = offset.saturating_sub(self.snippet_radius).min(text.len());
        let mut end = offset.saturating_add(self.snippet_radius).min(text.len());
        while !text.is_char_boundary(start) {
            start -= 1;
        }
        while !text.is_char_boundary(end) {
            end += 1;
        }
        &text[start..end]
    }

    pub fn titles(&self) -> &[String] {
        &self.toc.titles
    }

    pub fn ranges(&self) -> &RangeTable {
        &self.ranges
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }
}
