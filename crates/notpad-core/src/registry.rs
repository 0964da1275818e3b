//! Highlight span registry.
//!
//! Owns the classification spans currently applied to the buffer. Spans are never patched
//! incrementally by the classifier: [`HighlightRegistry::reclassify`] drops every span of every
//! class and installs a fresh set. Overlaps are kept as produced and resolved at render time by
//! [`TokenClass::render_priority`].

use crate::classify::{ClassifiedSpan, Classifier};
use crate::delta::TextDelta;
use crate::intervals::{Interval, IntervalTree};
use notpad_lang::{Rgb, TokenClass};

/// A maximal run of characters sharing one resolved class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledRun {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
    /// Resolved class, `None` for plain text.
    pub class: Option<TokenClass>,
}

impl StyledRun {
    /// Display color of this run.
    pub fn color(&self) -> Rgb {
        Rgb::for_class(self.class)
    }
}

/// Classification spans applied to the buffer.
#[derive(Debug, Default)]
pub struct HighlightRegistry {
    spans: IntervalTree<TokenClass>,
}

impl HighlightRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all spans, classify `text` and install the result. Returns the span count.
    pub fn reclassify(&mut self, text: &str, classifier: &Classifier) -> usize {
        let spans = classifier.classify(text);
        self.spans.replace_all(
            spans
                .iter()
                .map(|s| Interval::new(s.start, s.end, s.class))
                .collect(),
        );
        tracing::debug!(spans = self.spans.len(), "reclassified buffer");
        self.spans.len()
    }

    /// Remove every classification span without recomputing. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.spans.len();
        self.spans.clear();
        tracing::debug!(removed, "cleared classification");
        removed
    }

    /// Remove the spans of one class.
    pub fn clear_class(&mut self, class: TokenClass) -> usize {
        self.spans.retain(|i| i.value != class)
    }

    /// Move spans along with a buffer edit.
    pub fn apply_delta(&mut self, delta: &TextDelta) {
        self.spans.apply_delta(delta);
    }

    /// All spans, sorted by `(start, end, class)`.
    pub fn spans(&self) -> Vec<ClassifiedSpan> {
        let mut spans: Vec<ClassifiedSpan> = self.spans.iter().map(ClassifiedSpan::from).collect();
        spans.sort();
        spans
    }

    /// Spans of one class, in start order.
    pub fn spans_of(&self, class: TokenClass) -> Vec<ClassifiedSpan> {
        self.spans
            .iter()
            .filter(|i| i.value == class)
            .map(ClassifiedSpan::from)
            .collect()
    }

    /// Number of spans.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` if no spans are applied.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The class that renders at `offset`, resolving overlaps by priority.
    pub fn class_at(&self, offset: usize) -> Option<TokenClass> {
        self.spans
            .query_point(offset)
            .into_iter()
            .map(|i| i.value)
            .max_by_key(|class| class.render_priority())
    }

    /// Split `[start, end)` into maximal runs of equal resolved class.
    pub fn styled_runs(&self, start: usize, end: usize) -> Vec<StyledRun> {
        if start >= end {
            return Vec::new();
        }
        let spans = self.spans.query_range(start, end);

        // Every span boundary inside the range starts a new segment.
        let mut cuts: Vec<usize> = spans
            .iter()
            .flat_map(|i| [i.start, i.end])
            .filter(|&offset| offset > start && offset < end)
            .collect();
        cuts.push(start);
        cuts.push(end);
        cuts.sort_unstable();
        cuts.dedup();

        let mut runs: Vec<StyledRun> = Vec::new();
        for pair in cuts.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let class = spans
                .iter()
                .filter(|i| i.contains(from))
                .map(|i| i.value)
                .max_by_key(|class| class.render_priority());
            match runs.last_mut() {
                Some(run) if run.class == class => run.end = to,
                _ => runs.push(StyledRun {
                    start: from,
                    end: to,
                    class,
                }),
            }
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommentPolicy;
    use crate::delta::TextDeltaEdit;
    use pretty_assertions::assert_eq;

    fn python() -> Classifier {
        Classifier::python(CommentPolicy::OutsideStrings).unwrap()
    }

    #[test]
    fn test_reclassify_is_idempotent() {
        let classifier = python();
        let text = "while True:\n    print('#', 1.5)  # loop\n";
        let mut registry = HighlightRegistry::new();

        registry.reclassify(text, &classifier);
        let first = registry.spans();
        registry.reclassify(text, &classifier);
        assert_eq!(registry.spans(), first);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut registry = HighlightRegistry::new();
        registry.reclassify("x = 1", &python());
        assert_eq!(registry.clear(), 1);
        assert!(registry.is_empty());
        assert_eq!(registry.class_at(4), None);
    }

    #[test]
    fn test_clear_class() {
        let mut registry = HighlightRegistry::new();
        registry.reclassify("if x: print(1)", &python());
        assert_eq!(registry.clear_class(TokenClass::Number), 1);
        assert!(registry.spans_of(TokenClass::Number).is_empty());
        assert_eq!(registry.spans_of(TokenClass::Keyword).len(), 1);
    }

    #[test]
    fn test_render_priority_resolves_overlap() {
        let classifier = Classifier::python(CommentPolicy::Literal).unwrap();
        let mut registry = HighlightRegistry::new();
        registry.reclassify("s = 'a # b'", &classifier);

        assert_eq!(registry.class_at(5), Some(TokenClass::String));
        // The comment started inside the string wins where both cover.
        assert_eq!(registry.class_at(7), Some(TokenClass::Comment));
    }

    #[test]
    fn test_styled_runs() {
        let mut registry = HighlightRegistry::new();
        registry.reclassify("x = 10 # hi", &python());

        let runs = registry.styled_runs(0, 11);
        assert_eq!(
            runs,
            vec![
                StyledRun { start: 0, end: 4, class: None },
                StyledRun { start: 4, end: 6, class: Some(TokenClass::Number) },
                StyledRun { start: 6, end: 7, class: None },
                StyledRun { start: 7, end: 11, class: Some(TokenClass::Comment) },
            ]
        );
        assert_eq!(runs[1].color(), TokenClass::Number.color());
        assert_eq!(runs[0].color(), Rgb::PLAIN);
    }

    #[test]
    fn test_styled_runs_resolve_overlap_and_clip() {
        let classifier = Classifier::python(CommentPolicy::Literal).unwrap();
        let mut registry = HighlightRegistry::new();
        registry.reclassify("s = 'a # b'", &classifier);

        assert_eq!(
            registry.styled_runs(2, 11),
            vec![
                StyledRun { start: 2, end: 4, class: None },
                StyledRun { start: 4, end: 7, class: Some(TokenClass::String) },
                StyledRun { start: 7, end: 11, class: Some(TokenClass::Comment) },
            ]
        );
        assert!(registry.styled_runs(5, 5).is_empty());
    }

    #[test]
    fn test_apply_delta_shifts_spans() {
        let mut registry = HighlightRegistry::new();
        registry.reclassify("if x", &python());
        registry.apply_delta(&TextDelta::single(
            4,
            TextDeltaEdit {
                start: 0,
                deleted_text: String::new(),
                inserted_text: "  ".to_string(),
            },
        ));
        assert_eq!(
            registry.spans(),
            vec![ClassifiedSpan::new(2, 4, TokenClass::Keyword)]
        );
    }
}
