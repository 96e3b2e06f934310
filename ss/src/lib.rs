//! ShakeSearch - substring search over the complete works
//!
//! Loads one large text corpus, indexes it once, and answers exact
//! case-insensitive substring queries. Every match comes back with the text
//! around it and the title of the work it falls in.
//!
//! # Architecture
//!
//! ```text
//! Corpus ──┬──> PositionIndex (lowercased)  ──────────────┐
//!          │                                              ├──> Searcher::search
//!          └──> TableOfContents ──> RangeTable ───────────┘
//!                   (titles)     (per-title start offsets)
//! ```
//!
//! All state is built once in [`Searcher::load`] and only read afterwards,
//! so a single `Arc<Searcher>` can be shared by every request handler.
//!
//! # Example
//!
//! ```ignore
//! use shakesearch::{SearchOptions, Searcher};
//!
//! let searcher = Searcher::load("completeworks.txt", &SearchOptions::default())?;
//! for m in searcher.search("wherefore art thou") {
//!     println!("[{}] {}", m.title, m.snippet);
//! }
//! ```

pub mod cli;
pub mod config;
mod corpus;
mod error;
mod index;
mod ranges;
mod searcher;
pub mod server;
mod titles;

pub use corpus::Corpus;
pub use error::SearchError;
pub use index::PositionIndex;
pub use ranges::{RangeResolutionStrategy, RangeTable, ResolveContext, SecondOccurrence, StandaloneHeading, StrategyKind};
pub use searcher::{Match, SearchOptions, Searcher};
pub use titles::{TableOfContents, TocMarkers, extract_titles};

/// Default corpus file, relative to the working directory
pub const DEFAULT_CORPUS_PATH: &str = "completeworks.txt";

/// Default directory served for every path other than the search endpoint
///
/// Relative to the working directory, so it matches `ss/static` only when
/// running from `ss/`. The workspace-root `shakesearch.yml` points at
/// `ss/static` for runs from the root.
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Default listen port when neither `--port` nor `PORT` is set
pub const DEFAULT_PORT: u16 = 3001;

/// Bytes of context kept on each side of a match
pub const DEFAULT_SNIPPET_RADIUS: usize = 250;
