//! Title range resolution and lookup
//!
//! Every title in the table of contents appears at least twice in the
//! corpus: once in the listing and once as the heading of the work itself.
//! A [`RangeResolutionStrategy`] picks the heading occurrence for each title,
//! producing a [`RangeTable`] of content start offsets. At query time the
//! table attributes a match offset to the title whose range contains it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::index::PositionIndex;
use crate::titles::TableOfContents;

/// Content start offset per title, in table-of-contents order
///
/// `None` means the start could not be determined. The table is built once
/// and has exactly one entry per title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeTable(Vec<Option<usize>>);

impl RangeTable {
    pub fn new(starts: Vec<Option<usize>>) -> Self {
        Self(starts)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<usize> {
        self.0.get(i).copied().flatten()
    }

    /// Signed view with `-1` for unresolved entries
    pub fn raw(&self) -> Vec<i64> {
        self.0.iter().map(|s| s.map_or(-1, |s| s as i64)).collect()
    }

    /// Number of entries that could not be resolved
    pub fn unresolved(&self) -> usize {
        self.0.iter().filter(|s| s.is_none()).count()
    }

    /// Index of the title whose range contains `offset`
    ///
    /// Scans in table order and returns the first owner:
    /// - unresolved entries are skipped;
    /// - the last entry owns everything from its start onwards;
    /// - any other entry owns `start..next_start`, but only when the next
    ///   entry is resolved. Offsets in the range of an entry followed by an
    ///   unresolved one fall through to later entries.
    pub fn owner(&self, offset: usize) -> Option<usize> {
        let last = self.0.len().checked_sub(1)?;
        for (i, start) in self.0.iter().enumerate() {
            let Some(start) = *start else {
                continue;
            };

            if i == last {
                if start <= offset {
                    return Some(i);
                }
                continue;
            }

            let Some(end) = self.0[i + 1] else {
                continue;
            };

            if start <= offset && offset < end {
                return Some(i);
            }
        }
        None
    }
}

/// What a strategy may consult when resolving ranges
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Original corpus text
    pub corpus: &'a str,

    /// Index over the original (not lowercased) corpus bytes
    pub raw_index: &'a PositionIndex,
}

/// Picks the content start offset of each title
pub trait RangeResolutionStrategy: Send + Sync {
    /// Strategy name for logging
    fn name(&self) -> &'static str;

    /// One entry per title, same order as `toc.titles`
    fn resolve(&self, toc: &TableOfContents, ctx: &ResolveContext<'_>) -> RangeTable;
}

/// Second literal occurrence of the title is the start of its content
///
/// The first occurrence is assumed to be the listing entry. A title found
/// fewer than twice is left unresolved. This breaks when a title text also
/// shows up elsewhere before its own heading (inside another title, or
/// quoted in another work).
#[derive(Debug, Clone, Copy, Default)]
pub struct SecondOccurrence;

impl RangeResolutionStrategy for SecondOccurrence {
    fn name(&self) -> &'static str {
        "second-occurrence"
    }

    fn resolve(&self, toc: &TableOfContents, ctx: &ResolveContext<'_>) -> RangeTable {
        let starts = toc
            .titles
            .iter()
            .map(|title| {
                let found = ctx.raw_index.lookup(title.as_bytes(), Some(2));
                let start = found.get(1).copied();
                if start.is_none() {
                    debug!(%title, found = found.len(), "SecondOccurrence: unresolved title");
                }
                start
            })
            .collect();
        RangeTable::new(starts)
    }
}

/// First occurrence after the listing that fills a whole line
///
/// Stricter than [`SecondOccurrence`]: mentions of a title inside running
/// text or inside a longer title are ignored, only a line consisting of the
/// title alone (surrounding whitespace aside) counts as its heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandaloneHeading;

impl StandaloneHeading {
    fn is_heading(corpus: &str, offset: usize, title: &str) -> bool {
        let line_start = corpus[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line_end = corpus[offset..].find('\n').map_or(corpus.len(), |i| offset + i);
        corpus[line_start..line_end].trim() == title
    }
}

impl RangeResolutionStrategy for StandaloneHeading {
    fn name(&self) -> &'static str {
        "standalone-heading"
    }

    fn resolve(&self, toc: &TableOfContents, ctx: &ResolveContext<'_>) -> RangeTable {
        let starts = toc
            .titles
            .iter()
            .map(|title| {
                let start = ctx
                    .raw_index
                    .lookup(title.as_bytes(), None)
                    .into_iter()
                    .filter(|&o| o >= toc.span.end)
                    .find(|&o| Self::is_heading(ctx.corpus, o, title));
                if start.is_none() {
                    debug!(%title, "StandaloneHeading: unresolved title");
                }
                start
            })
            .collect();
        RangeTable::new(starts)
    }
}

/// Configurable choice of built-in strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    SecondOccurrence,
    StandaloneHeading,
}

impl StrategyKind {
    pub fn strategy(self) -> Box<dyn RangeResolutionStrategy> {
        match self {
            StrategyKind::SecondOccurrence => Box::new(SecondOccurrence),
            StrategyKind::StandaloneHeading => Box::new(StandaloneHeading),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::titles::{TocMarkers, extract_titles};
    use proptest::prelude::*;

    fn table(starts: &[i64]) -> RangeTable {
        RangeTable::new(starts.iter().map(|&s| usize::try_from(s).ok()).collect())
    }

    #[test]
    fn test_owner_half_open_ranges() {
        let t = table(&[10, 20, 30]);
        assert_eq!(t.owner(5), None);
        assert_eq!(t.owner(10), Some(0));
        assert_eq!(t.owner(19), Some(0));
        assert_eq!(t.owner(20), Some(1));
        assert_eq!(t.owner(29), Some(1));
        assert_eq!(t.owner(30), Some(2));
        assert_eq!(t.owner(10_000), Some(2));
    }

    #[test]
    fn test_owner_skips_unresolved_entries() {
        let t = table(&[10, -1, 30]);
        // Entry 0 cannot be bounded, entry 1 is unknown.
        assert_eq!(t.owner(15), None);
        assert_eq!(t.owner(25), None);
        assert_eq!(t.owner(30), Some(2));
    }

    #[test]
    fn test_owner_unresolved_last_entry() {
        let t = table(&[10, 20, -1]);
        assert_eq!(t.owner(15), Some(0));
        assert_eq!(t.owner(25), None);
    }

    #[test]
    fn test_owner_empty_table() {
        assert_eq!(RangeTable::default().owner(0), None);
    }

    #[test]
    fn test_raw_uses_minus_one_sentinel() {
        let t = table(&[5, -1, 9]);
        assert_eq!(t.raw(), vec![5, -1, 9]);
        assert_eq!(t.unresolved(), 1);
        assert_eq!(t.get(1), None);
        assert_eq!(t.get(2), Some(9));
    }

    const CORPUS: &str = "by William Shakespeare\nContents\n  Hamlet\n  Macbeth\n  Lear\nTHE SONNETS\n\
                          \nHamlet\nHamlet speaks. Then Macbeth is mentioned.\n\nMacbeth\nThe thane.\n";

    fn resolve_with(strategy: &dyn RangeResolutionStrategy) -> (TableOfContents, RangeTable) {
        let toc = extract_titles(CORPUS, &TocMarkers::default()).unwrap();
        let raw_index = PositionIndex::new(CORPUS);
        let ctx = ResolveContext {
            corpus: CORPUS,
            raw_index: &raw_index,
        };
        let ranges = strategy.resolve(&toc, &ctx);
        (toc, ranges)
    }

    #[test]
    fn test_second_occurrence_resolution() {
        let (toc, ranges) = resolve_with(&SecondOccurrence);
        assert_eq!(ranges.len(), toc.len());

        let hamlet_body = CORPUS.find("\nHamlet\n").unwrap() + 1;
        assert_eq!(ranges.get(0), Some(hamlet_body));
        // Second "Macbeth" is the mention inside Hamlet's body.
        let mention = CORPUS.find("Then Macbeth").unwrap() + 5;
        assert_eq!(ranges.get(1), Some(mention));
        // "Lear" appears only in the listing.
        assert_eq!(ranges.get(2), None);
    }

    #[test]
    fn test_standalone_heading_ignores_mentions() {
        let (toc, ranges) = resolve_with(&StandaloneHeading);
        assert_eq!(ranges.len(), toc.len());

        let macbeth_heading = CORPUS.find("\nMacbeth\nThe thane").unwrap() + 1;
        assert_eq!(ranges.get(1), Some(macbeth_heading));
        assert_eq!(ranges.get(2), None);
    }

    #[test]
    fn test_strategy_kind_names() {
        assert_eq!(StrategyKind::SecondOccurrence.strategy().name(), "second-occurrence");
        assert_eq!(StrategyKind::StandaloneHeading.strategy().name(), "standalone-heading");
        let parsed: StrategyKind = serde_yaml::from_str("standalone-heading").unwrap();
        assert_eq!(parsed, StrategyKind::StandaloneHeading);
    }

    proptest! {
        #[test]
        fn prop_owner_follows_increasing_starts(starts in proptest::collection::btree_set(1usize..2_000, 1..20)) {
            let starts: Vec<usize> = starts.into_iter().collect();
            let t = RangeTable::new(starts.iter().copied().map(Some).collect());
            let last = starts.len() - 1;

            for o in 0..starts[0] {
                prop_assert_eq!(t.owner(o), None);
            }
            for (i, pair) in starts.windows(2).enumerate() {
                for o in pair[0]..pair[1] {
                    prop_assert_eq!(t.owner(o), Some(i));
                }
            }
            prop_assert_eq!(t.owner(starts[last]), Some(last));
            prop_assert_eq!(t.owner(starts[last] + 5_000), Some(last));
        }
    }
}
