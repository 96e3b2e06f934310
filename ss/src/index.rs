//! Suffix-array position index
//!
//! Built once over a fixed byte sequence, then answers "every offset where
//! `pattern` occurs" with two binary searches over the sorted suffixes.

use std::cmp::Ordering;
use tracing::{debug, info};

/// Sorted-suffix index over an owned byte sequence
///
/// Lookups return offsets in text order (ascending). The index is immutable
/// after [`PositionIndex::new`], so `&PositionIndex` can be shared across
/// threads freely.
#[derive(Debug, Clone)]
pub struct PositionIndex {
    text: Vec<u8>,
    suffixes: Vec<usize>,
}

impl PositionIndex {
    /// Build the index (prefix doubling with counting sorts, O(n log n))
    pub fn new(text: impl Into<Vec<u8>>) -> Self {
        let text = text.into();
        debug!(len = text.len(), "PositionIndex::new: called");
        let suffixes = build_suffix_array(&text);
        info!(len = text.len(), "Built position index");
        Self { text, suffixes }
    }

    /// Length of the indexed byte sequence
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Offsets of every occurrence of `pattern`, ascending
    ///
    /// `max = None` returns all matches; `Some(n)` returns the first `n` in
    /// text order. An empty pattern matches nothing.
    pub fn lookup(&self, pattern: &[u8], max: Option<usize>) -> Vec<usize> {
        let range = self.suffix_range(pattern);
        let mut offsets = self.suffixes[range].to_vec();

        if let Some(max) = max
            && offsets.len() > max
        {
            if max == 0 {
                return Vec::new();
            }
            offsets.select_nth_unstable(max - 1);
            offsets.truncate(max);
        }

        offsets.sort_unstable();
        debug!(pattern_len = pattern.len(), ?max, found = offsets.len(), "PositionIndex::lookup");
        offsets
    }

    /// Number of occurrences of `pattern`
    pub fn count(&self, pattern: &[u8]) -> usize {
        self.suffix_range(pattern).len()
    }

    /// Contiguous run of suffixes that start with `pattern`
    fn suffix_range(&self, pattern: &[u8]) -> std::ops::Range<usize> {
        if pattern.is_empty() {
            return 0..0;
        }
        let text = &self.text;
        let start = self
            .suffixes
            .partition_point(|&i| compare_prefix(&text[i..], pattern) == Ordering::Less);
        let end = self
            .suffixes
            .partition_point(|&i| compare_prefix(&text[i..], pattern) != Ordering::Greater);
        start..end
    }
}

/// Compare the first `pattern.len()` bytes of `suffix` against `pattern`
///
/// A suffix that starts with `pattern` compares `Equal`.
fn compare_prefix(suffix: &[u8], pattern: &[u8]) -> Ordering {
    let head = &suffix[..suffix.len().min(pattern.len())];
    head.cmp(pattern)
}

/// Sort all suffixes of `text`
///
/// Each round orders suffixes by their first `2k` bytes using the ranks of
/// the previous round as keys; stops once every rank is distinct.
fn build_suffix_array(text: &[u8]) -> Vec<usize> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }

    let mut sa: Vec<usize> = (0..n).collect();
    sa.sort_by_key(|&i| text[i]);

    let mut rank = vec![0usize; n];
    for j in 1..n {
        let (prev, cur) = (sa[j - 1], sa[j]);
        rank[cur] = rank[prev] + usize::from(text[cur] != text[prev]);
    }

    let mut by_second = vec![0usize; n];
    let mut next_rank = vec![0usize; n];
    let mut k = 1;

    while rank[sa[n - 1]] < n - 1 {
        // Suffixes too short to have a second half sort first.
        let mut p = 0;
        for i in n.saturating_sub(k)..n {
            by_second[p] = i;
            p += 1;
        }
        for &s in &sa {
            if s >= k {
                by_second[p] = s - k;
                p += 1;
            }
        }

        // Stable counting sort on the first-half rank.
        let classes = rank[sa[n - 1]] + 1;
        let mut starts = vec![0usize; classes];
        for &r in &rank {
            starts[r] += 1;
        }
        let mut total = 0;
        for slot in starts.iter_mut() {
            let count = *slot;
            *slot = total;
            total += count;
        }
        for &i in &by_second {
            let r = rank[i];
            sa[starts[r]] = i;
            starts[r] += 1;
        }

        let second = |i: usize| if i + k < n { Some(rank[i + k]) } else { None };
        next_rank[sa[0]] = 0;
        for j in 1..n {
            let (prev, cur) = (sa[j - 1], sa[j]);
            let differs = rank[prev] != rank[cur] || second(prev) != second(cur);
            next_rank[cur] = next_rank[prev] + usize::from(differs);
        }
        std::mem::swap(&mut rank, &mut next_rank);
        k *= 2;
    }

    sa
}
