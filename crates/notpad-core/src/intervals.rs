//! Span storage.
//!
//! A sorted-vector interval tree holding half-open `[start, end)` character ranges with a payload.
//! Both the classification registry and the search tracker keep their spans here, and both rely
//! on [`IntervalTree::apply_delta`] to move spans along with buffer edits.

use crate::delta::TextDelta;

/// A half-open character range with a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval<T> {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
    /// Payload (token class, search term, ...).
    pub value: T,
}

impl<T> Interval<T> {
    /// Create a new interval.
    pub fn new(start: usize, end: usize, value: T) -> Self {
        Self { start, end, value }
    }

    /// Check if interval contains a specific position.
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Returns `true` for an empty range.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Interval tree.
///
/// Intervals are kept sorted by start; `prefix_max_end` lets point and range queries stop
/// scanning backwards as soon as no earlier interval can reach the query position.
/// Query complexity: O(log n + k). Insertion: O(n).
#[derive(Debug, Clone)]
pub struct IntervalTree<T> {
    intervals: Vec<Interval<T>>,
    /// `prefix_max_end[i] = max(intervals[0..=i].end)`
    prefix_max_end: Vec<usize>,
}

impl<T> IntervalTree<T> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
            prefix_max_end: Vec::new(),
        }
    }

    fn rebuild_prefix_max_end_from(&mut self, start_idx: usize) {
        if self.intervals.is_empty() {
            self.prefix_max_end.clear();
            return;
        }

        if self.prefix_max_end.len() != self.intervals.len() {
            self.prefix_max_end.resize(self.intervals.len(), 0);
        }

        let mut max_end = if start_idx == 0 {
            0
        } else {
            self.prefix_max_end[start_idx - 1]
        };

        for (idx, interval) in self.intervals.iter().enumerate().skip(start_idx) {
            max_end = max_end.max(interval.end);
            self.prefix_max_end[idx] = max_end;
        }
    }

    fn rebuild_prefix_max_end(&mut self) {
        self.rebuild_prefix_max_end_from(0);
    }

    /// Insert an interval, keeping start order. Equal starts keep insertion order.
    pub fn insert(&mut self, interval: Interval<T>) {
        let pos = self
            .intervals
            .partition_point(|i| i.start <= interval.start);

        self.intervals.insert(pos, interval);
        self.prefix_max_end.insert(pos, 0);
        self.rebuild_prefix_max_end_from(pos);
    }

    /// Replace the contents with `intervals` (sorted here).
    pub fn replace_all(&mut self, mut intervals: Vec<Interval<T>>) {
        intervals.sort_by_key(|i| i.start);
        self.intervals = intervals;
        self.rebuild_prefix_max_end();
    }

    /// Query all intervals containing `pos`.
    pub fn query_point(&self, pos: usize) -> Vec<&Interval<T>> {
        if self.intervals.is_empty() {
            return Vec::new();
        }

        let mut result = Vec::new();

        // All intervals with start <= pos are before idx.
        let idx = self.intervals.partition_point(|i| i.start <= pos);

        for i in (0..idx).rev() {
            if self.prefix_max_end[i] <= pos {
                break;
            }

            let interval = &self.intervals[i];
            if interval.contains(pos) {
                result.push(interval);
            }
        }

        result
    }

    /// Returns `true` if any interval contains `pos`.
    pub fn covers(&self, pos: usize) -> bool {
        !self.query_point(pos).is_empty()
    }

    /// Query all intervals overlapping `[start, end)`, in start order.
    pub fn query_range(&self, start: usize, end: usize) -> Vec<&Interval<T>> {
        if self.intervals.is_empty() || start >= end {
            return Vec::new();
        }

        let search_end = self.intervals.partition_point(|i| i.start < end);
        if search_end == 0 {
            return Vec::new();
        }

        let mut scan_start = self
            .intervals
            .partition_point(|i| i.start < start)
            .min(search_end);

        while scan_start > 0 && self.prefix_max_end[scan_start - 1] > start {
            scan_start -= 1;
        }

        self.intervals[scan_start..search_end]
            .iter()
            .filter(|interval| interval.start < end && interval.end > start)
            .collect()
    }

    /// Iterate intervals in start order.
    pub fn iter(&self) -> impl Iterator<Item = &Interval<T>> {
        self.intervals.iter()
    }

    /// Keep only the intervals for which `keep` returns `true`. Returns how many were removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Interval<T>) -> bool,
    {
        let before = self.intervals.len();
        self.intervals.retain(|i| keep(i));
        let removed = before - self.intervals.len();
        if removed > 0 {
            self.rebuild_prefix_max_end();
        }
        removed
    }

    /// Clear all intervals.
    pub fn clear(&mut self) {
        self.intervals.clear();
        self.prefix_max_end.clear();
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Shift offsets for an insertion of `delta` chars at `pos`.
    ///
    /// An interval starting at `pos` moves right; an interval strictly containing `pos` grows;
    /// an interval ending at `pos` is unchanged.
    pub fn update_for_insertion(&mut self, pos: usize, delta: usize) {
        if delta == 0 {
            return;
        }
        for interval in &mut self.intervals {
            if interval.start >= pos {
                interval.start += delta;
                interval.end += delta;
            } else if interval.end > pos {
                interval.end += delta;
            }
        }
        self.rebuild_prefix_max_end();
    }

    /// Shift offsets for a deletion of `[start, end)`.
    ///
    /// Intervals entirely inside the deleted range are removed, partially covered ones shrink.
    pub fn update_for_deletion(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let delta = end - start;

        self.intervals.retain_mut(|interval| {
            if interval.end <= start {
                // before the deletion
            } else if interval.start >= end {
                interval.start -= delta;
                interval.end -= delta;
            } else if interval.start >= start && interval.end <= end {
                return false;
            } else if interval.start < start && interval.end > end {
                interval.end -= delta;
            } else if interval.start < start {
                interval.end = start;
            } else {
                interval.start = start;
                interval.end -= delta;
            }
            true
        });

        // Shifting can only reorder intervals that collapsed onto the same start.
        self.intervals.sort_by_key(|i| i.start);
        self.rebuild_prefix_max_end();
    }

    /// Apply every edit of `delta`, in order.
    pub fn apply_delta(&mut self, delta: &TextDelta) {
        for edit in &delta.edits {
            self.update_for_deletion(edit.start, edit.end());
            self.update_for_insertion(edit.start, edit.inserted_len());
        }
    }
}

impl<T> Default for IntervalTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::TextDeltaEdit;
    use pretty_assertions::assert_eq;

    fn ranges<T>(tree: &IntervalTree<T>) -> Vec<(usize, usize)> {
        tree.iter().map(|i| (i.start, i.end)).collect()
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut tree = IntervalTree::new();
        tree.insert(Interval::new(10, 20, 'a'));
        tree.insert(Interval::new(0, 5, 'b'));
        tree.insert(Interval::new(10, 12, 'c'));
        assert_eq!(ranges(&tree), vec![(0, 5), (10, 20), (10, 12)]);
    }

    #[test]
    fn test_query_point() {
        let mut tree = IntervalTree::new();
        tree.insert(Interval::new(0, 100, 1));
        tree.insert(Interval::new(10, 20, 2));
        tree.insert(Interval::new(30, 40, 3));

        let hits: Vec<i32> = tree.query_point(15).iter().map(|i| i.value).collect();
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&1) && hits.contains(&2));
        assert_eq!(tree.query_point(100).len(), 0);
        assert!(tree.covers(35));
        assert!(!tree.covers(150));
    }

    #[test]
    fn test_query_range() {
        let mut tree = IntervalTree::new();
        tree.insert(Interval::new(0, 50, ()));
        tree.insert(Interval::new(10, 20, ()));
        tree.insert(Interval::new(60, 70, ()));

        let hits: Vec<(usize, usize)> = tree
            .query_range(45, 61)
            .iter()
            .map(|i| (i.start, i.end))
            .collect();
        assert_eq!(hits, vec![(0, 50), (60, 70)]);
        assert!(tree.query_range(50, 60).is_empty());
    }

    #[test]
    fn test_update_for_insertion_boundaries() {
        let mut tree = IntervalTree::new();
        tree.insert(Interval::new(0, 3, ()));
        tree.insert(Interval::new(4, 7, ()));
        tree.insert(Interval::new(8, 11, ()));

        // At the end of the first, the start of the second, strictly inside the third.
        tree.update_for_insertion(9, 2);
        tree.update_for_insertion(4, 1);
        tree.update_for_insertion(3, 1);
        assert_eq!(ranges(&tree), vec![(0, 3), (6, 9), (10, 15)]);
    }

    #[test]
    fn test_update_for_deletion() {
        let mut tree = IntervalTree::new();
        tree.insert(Interval::new(0, 5, ()));
        tree.insert(Interval::new(6, 8, ()));
        tree.insert(Interval::new(10, 15, ()));

        tree.update_for_deletion(4, 9);
        assert_eq!(ranges(&tree), vec![(0, 4), (5, 10)]);
    }

    #[test]
    fn test_apply_delta_replace() {
        let mut tree = IntervalTree::new();
        tree.insert(Interval::new(0, 3, "foo"));
        tree.insert(Interval::new(8, 11, "foo"));

        tree.apply_delta(&TextDelta {
            before_char_count: 11,
            after_char_count: 11,
            edits: vec![TextDeltaEdit {
                start: 0,
                deleted_text: "foo".to_string(),
                inserted_text: "baz".to_string(),
            }],
        });
        // The replaced span vanishes with its text; the other keeps its place.
        assert_eq!(ranges(&tree), vec![(8, 11)]);
    }

    #[test]
    fn test_retain() {
        let mut tree = IntervalTree::new();
        for i in 0..5 {
            tree.insert(Interval::new(i * 10, i * 10 + 5, i));
        }
        let removed = tree.retain(|i| i.value % 2 == 0);
        assert_eq!(removed, 2);
        assert_eq!(tree.len(), 3);
        assert!(!tree.covers(12));
        assert!(tree.covers(42));
    }

    #[test]
    fn test_replace_all_sorts() {
        let mut tree = IntervalTree::new();
        tree.replace_all(vec![Interval::new(5, 6, ()), Interval::new(1, 2, ())]);
        assert_eq!(ranges(&tree), vec![(1, 2), (5, 6)]);
        assert!(tree.covers(5));
    }
}
