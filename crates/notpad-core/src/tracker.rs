//! Search highlight tracker.
//!
//! Two independent highlight categories with their own lifecycles:
//!
//! - **All matches**: created in bulk by [`SearchTracker::highlight_all`], pruned one by one as
//!   edits invalidate them, cleared in bulk by an empty term or a new bulk highlight.
//! - **Current match**: at most one span, replaced by each find / find-next / find-prev.
//!
//! Spans move with edits ([`SearchTracker::apply_delta`]) and are then checked by
//! [`SearchTracker::validate`]: a span whose text no longer equals its term is dropped. Spans
//! are never recomputed from the buffer after an edit, only pruned.

use crate::buffer::TextHost;
use crate::delta::TextDelta;
use crate::intervals::{Interval, IntervalTree};
use crate::search::{Direction, SearchMatch, find_all, search};
use std::sync::Arc;

/// Which highlight category a span belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchCategory {
    /// Highlight-all spans.
    AllMatches,
    /// The single current find match.
    CurrentMatch,
}

/// A live search highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpan {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
    /// Owning category.
    pub category: SearchCategory,
    /// The text this span must keep covering to stay alive.
    pub term: String,
}

/// Result of a find / find-next / find-prev action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindOutcome {
    /// The current match moved here.
    Found(SearchMatch),
    /// The term does not occur in the buffer. The current match is cleared.
    NotFound,
    /// An empty term cleared the current match and the remembered term.
    Cleared,
    /// find-next / find-prev without a remembered term; the shell should run a fresh find.
    NoTerm,
}

/// Result of a highlight-all action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightOutcome {
    /// `count` occurrences were highlighted.
    Highlighted {
        /// Number of highlighted occurrences.
        count: usize,
    },
    /// The term does not occur in the buffer.
    NotFound,
    /// An empty term cleared every all-matches span and the remembered term.
    Cleared,
}

#[derive(Debug, Default)]
struct CategoryState {
    /// Remembered term; empty means reset.
    term: String,
    spans: IntervalTree<Arc<str>>,
}

impl CategoryState {
    fn reset(&mut self) {
        self.term.clear();
        self.spans.clear();
    }

    fn add(&mut self, m: SearchMatch) {
        let term: Arc<str> = Arc::from(self.term.as_str());
        self.spans.insert(Interval::new(m.start, m.end, term));
    }

    fn validate<H: TextHost + ?Sized>(&mut self, host: &H) -> usize {
        if self.term.is_empty() {
            let removed = self.spans.len();
            self.spans.clear();
            return removed;
        }
        self.spans
            .retain(|span| !span.is_empty() && host.slice(span.start, span.end) == *span.value)
    }
}

/// Owner of both search highlight categories.
#[derive(Debug, Default)]
pub struct SearchTracker {
    all: CategoryState,
    current: CategoryState,
}

impl SearchTracker {
    /// Create a tracker with no terms and no spans.
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight every non-overlapping occurrence of `term` in `text`.
    ///
    /// A non-empty term replaces all previous all-matches spans and clears the current match.
    /// An empty term clears all-matches spans and forgets the term.
    pub fn highlight_all(&mut self, text: &str, term: &str) -> HighlightOutcome {
        if term.is_empty() {
            self.all.reset();
            tracing::debug!("highlight-all cleared");
            return HighlightOutcome::Cleared;
        }

        self.all.spans.clear();
        self.all.term = term.to_string();
        self.current.spans.clear();

        let matches = find_all(text, term);
        for m in &matches {
            self.all.add(*m);
        }

        tracing::debug!(term, count = matches.len(), "highlight-all");
        if matches.is_empty() {
            HighlightOutcome::NotFound
        } else {
            HighlightOutcome::Highlighted {
                count: matches.len(),
            }
        }
    }

    /// Find `term` at or after `cursor`, wrapping to the start of the buffer.
    ///
    /// An empty term clears the current match and forgets the term.
    pub fn find(&mut self, text: &str, cursor: usize, term: &str) -> FindOutcome {
        if term.is_empty() {
            self.current.reset();
            tracing::debug!("find cleared");
            return FindOutcome::Cleared;
        }
        self.current.term = term.to_string();
        self.locate(text, cursor, Direction::Forward)
    }

    /// Next occurrence of the remembered term after `cursor` (the position itself excluded),
    /// wrapping to the start.
    pub fn find_next(&mut self, text: &str, cursor: usize) -> FindOutcome {
        if self.current.term.is_empty() {
            return FindOutcome::NoTerm;
        }
        self.locate(text, cursor.saturating_add(1), Direction::Forward)
    }

    /// Previous occurrence of the remembered term before `cursor`, wrapping to the end.
    pub fn find_prev(&mut self, text: &str, cursor: usize) -> FindOutcome {
        if self.current.term.is_empty() {
            return FindOutcome::NoTerm;
        }
        self.locate(text, cursor, Direction::Backward)
    }

    fn locate(&mut self, text: &str, from: usize, direction: Direction) -> FindOutcome {
        self.current.spans.clear();
        let found = search(text, &self.current.term, from, direction, true);
        tracing::debug!(term = %self.current.term, ?direction, ?found, "find");
        match found {
            Some(m) => {
                self.current.add(m);
                FindOutcome::Found(m)
            }
            None => FindOutcome::NotFound,
        }
    }

    /// Remove every span of both categories. Remembered terms are kept.
    pub fn clear_all_highlights(&mut self) {
        self.all.spans.clear();
        self.current.spans.clear();
    }

    /// Forget both terms and drop every span.
    pub fn reset(&mut self) {
        self.all.reset();
        self.current.reset();
    }

    /// Remember `term` as the find term without searching (used by replace-all).
    pub fn set_find_term(&mut self, term: &str) {
        self.current.term = term.to_string();
    }

    /// Move spans along with a buffer edit.
    pub fn apply_delta(&mut self, delta: &TextDelta) {
        self.all.spans.apply_delta(delta);
        self.current.spans.apply_delta(delta);
    }

    /// Drop every span whose text no longer equals its term. Returns how many were dropped.
    ///
    /// Reads only the text under each live span.
    pub fn validate<H: TextHost + ?Sized>(&mut self, host: &H) -> usize {
        let pruned = self.all.validate(host) + self.current.validate(host);
        if pruned > 0 {
            tracing::trace!(pruned, "pruned stale search spans");
        }
        pruned
    }

    /// The remembered highlight-all term, if any.
    pub fn highlight_term(&self) -> Option<&str> {
        (!self.all.term.is_empty()).then_some(self.all.term.as_str())
    }

    /// The remembered find term, if any.
    pub fn find_term(&self) -> Option<&str> {
        (!self.current.term.is_empty()).then_some(self.current.term.as_str())
    }

    /// The current match, if one is live.
    pub fn current_match(&self) -> Option<SearchMatch> {
        self.current.spans.iter().next().map(|i| SearchMatch {
            start: i.start,
            end: i.end,
        })
    }

    /// Live all-matches ranges, in start order.
    pub fn all_matches(&self) -> Vec<SearchMatch> {
        self.all
            .spans
            .iter()
            .map(|i| SearchMatch {
                start: i.start,
                end: i.end,
            })
            .collect()
    }

    /// Live spans of one category.
    pub fn spans(&self, category: SearchCategory) -> Vec<SearchSpan> {
        let state = match category {
            SearchCategory::AllMatches => &self.all,
            SearchCategory::CurrentMatch => &self.current,
        };
        state
            .spans
            .iter()
            .map(|i| SearchSpan {
                start: i.start,
                end: i.end,
                category,
                term: i.value.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use pretty_assertions::assert_eq;

    fn m(start: usize, end: usize) -> SearchMatch {
        SearchMatch { start, end }
    }

    #[test]
    fn test_highlight_all() {
        let mut tracker = SearchTracker::new();
        let outcome = tracker.highlight_all("foo bar foo", "foo");
        assert_eq!(outcome, HighlightOutcome::Highlighted { count: 2 });
        assert_eq!(tracker.all_matches(), vec![m(0, 3), m(8, 11)]);
        assert_eq!(tracker.highlight_term(), Some("foo"));
    }

    #[test]
    fn test_highlight_all_not_found_keeps_term() {
        let mut tracker = SearchTracker::new();
        tracker.highlight_all("foo", "foo");
        assert_eq!(tracker.highlight_all("foo", "zzz"), HighlightOutcome::NotFound);
        assert!(tracker.all_matches().is_empty());
        assert_eq!(tracker.highlight_term(), Some("zzz"));
    }

    #[test]
    fn test_highlight_all_clears_current_match() {
        let mut tracker = SearchTracker::new();
        tracker.find("a b a", 0, "b");
        assert!(tracker.current_match().is_some());
        tracker.highlight_all("a b a", "a");
        assert_eq!(tracker.current_match(), None);
        assert_eq!(tracker.find_term(), Some("b"));
    }

    #[test]
    fn test_empty_highlight_term_clears() {
        let mut tracker = SearchTracker::new();
        tracker.highlight_all("foo", "foo");
        assert_eq!(tracker.highlight_all("foo", ""), HighlightOutcome::Cleared);
        assert!(tracker.all_matches().is_empty());
        assert_eq!(tracker.highlight_term(), None);
    }

    #[test]
    fn test_find_wraps_from_cursor() {
        let mut tracker = SearchTracker::new();
        assert_eq!(tracker.find("a b a", 1, "a"), FindOutcome::Found(m(4, 5)));
        assert_eq!(tracker.find("a b a", 5, "a"), FindOutcome::Found(m(0, 1)));
        assert_eq!(tracker.current_match(), Some(m(0, 1)));
    }

    #[test]
    fn test_find_next_and_prev_exclude_position() {
        let mut tracker = SearchTracker::new();
        tracker.find("a b a", 4, "a");
        assert_eq!(tracker.find_next("a b a", 4), FindOutcome::Found(m(0, 1)));
        assert_eq!(tracker.find_prev("a b a", 0), FindOutcome::Found(m(4, 5)));
        assert_eq!(tracker.find_prev("a b a", 4), FindOutcome::Found(m(0, 1)));
    }

    #[test]
    fn test_find_next_without_term() {
        let mut tracker = SearchTracker::new();
        assert_eq!(tracker.find_next("abc", 0), FindOutcome::NoTerm);
        assert_eq!(tracker.find_prev("abc", 0), FindOutcome::NoTerm);
    }

    #[test]
    fn test_not_found_clears_current() {
        let mut tracker = SearchTracker::new();
        tracker.find("abc", 0, "b");
        assert_eq!(tracker.find("abc", 0, "z"), FindOutcome::NotFound);
        assert_eq!(tracker.current_match(), None);
        assert_eq!(tracker.find("", 0, "z"), FindOutcome::NotFound);
    }

    #[test]
    fn test_empty_find_term_resets() {
        let mut tracker = SearchTracker::new();
        tracker.find("abc", 0, "b");
        assert_eq!(tracker.find("abc", 0, ""), FindOutcome::Cleared);
        assert_eq!(tracker.find_term(), None);
        assert_eq!(tracker.current_match(), None);
    }

    #[test]
    fn test_validate_prunes_stale_span() {
        let mut buffer = Buffer::new("foo bar foo");
        let mut tracker = SearchTracker::new();
        tracker.highlight_all(&buffer.text(), "foo");

        let delta = buffer.replace_range(0, 3, "baz").unwrap();
        tracker.apply_delta(&delta);
        tracker.validate(&buffer);

        let spans = tracker.spans(SearchCategory::AllMatches);
        assert_eq!(
            spans,
            vec![SearchSpan {
                start: 8,
                end: 11,
                category: SearchCategory::AllMatches,
                term: "foo".to_string(),
            }]
        );
    }

    #[test]
    fn test_validate_prunes_grown_span() {
        let mut buffer = Buffer::new("foo");
        let mut tracker = SearchTracker::new();
        tracker.find(&buffer.text(), 0, "foo");

        let delta = buffer.replace_range(1, 1, "x").unwrap();
        tracker.apply_delta(&delta);
        assert_eq!(tracker.current_match(), Some(m(0, 4)));
        assert_eq!(tracker.validate(&buffer), 1);
        assert_eq!(tracker.current_match(), None);
        // The term is still remembered.
        assert_eq!(tracker.find_term(), Some("foo"));
    }

    #[test]
    fn test_spans_survive_shifting_edits() {
        let mut buffer = Buffer::new("foo bar foo");
        let mut tracker = SearchTracker::new();
        tracker.highlight_all(&buffer.text(), "foo");

        let delta = buffer.replace_range(4, 4, ">> ").unwrap();
        tracker.apply_delta(&delta);
        assert_eq!(tracker.validate(&buffer), 0);
        assert_eq!(tracker.all_matches(), vec![m(0, 3), m(11, 14)]);
    }

    #[test]
    fn test_clear_all_highlights_keeps_terms() {
        let mut tracker = SearchTracker::new();
        tracker.highlight_all("foo foo", "foo");
        tracker.find("foo foo", 0, "foo");
        tracker.clear_all_highlights();
        assert!(tracker.all_matches().is_empty());
        assert_eq!(tracker.current_match(), None);
        assert_eq!(tracker.highlight_term(), Some("foo"));
        assert_eq!(tracker.find_next("foo foo", 0), FindOutcome::Found(m(4, 7)));
    }
}
