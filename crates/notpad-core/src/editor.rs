//! Editor session.
//!
//! [`Editor`] ties the engine to one host buffer: it owns the classifier, the classification
//! registry, the search tracker and the coloring mode, and runs every user action to completion
//! before returning.
//!
//! Edits made through [`Editor::edit`] are followed automatically by [`Editor::handle_change`].
//! Hosts that edit their text some other way must pass the resulting [`TextDelta`] to
//! `handle_change` themselves; it is the edit-event entry point.

use crate::buffer::TextHost;
use crate::classify::Classifier;
use crate::config::{Coloring, EditorConfig};
use crate::delta::TextDelta;
use crate::error::CoreError;
use crate::indent::{BlockEdit, IndentUnit, indent_gutter, plan_indent, plan_outdent};
use crate::line_index::LineIndex;
use crate::registry::HighlightRegistry;
use crate::search::find_all;
use crate::tracker::{FindOutcome, HighlightOutcome, SearchTracker};
use notpad_lang::LanguageTables;
use std::fmt;

/// Result of a replace-all action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// `count` occurrences were replaced.
    Replaced {
        /// Number of replaced occurrences.
        count: usize,
    },
    /// The term does not occur in the buffer. Nothing changed.
    NotFound,
    /// The find term was empty. Nothing changed.
    NoTerm,
}

/// Cursor line and total line count, for the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    /// 1-based cursor line.
    pub line: usize,
    /// Number of lines in the buffer.
    pub total_lines: usize,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line: {}/{}", self.line, self.total_lines)
    }
}

/// An editing session over one host buffer.
pub struct Editor<H> {
    host: H,
    config: EditorConfig,
    coloring: Coloring,
    classifier: Classifier,
    registry: HighlightRegistry,
    tracker: SearchTracker,
    line_index: LineIndex,
}

impl<H: TextHost> Editor<H> {
    /// Create a session over `host` and classify its current content (if coloring is enabled).
    pub fn new(host: H, config: EditorConfig, tables: &LanguageTables) -> Result<Self, CoreError> {
        config.validate()?;
        let classifier = Classifier::new(tables, config.comment_policy)?;
        let line_index = LineIndex::new(&host.text());

        let mut editor = Self {
            host,
            coloring: config.coloring,
            config,
            classifier,
            registry: HighlightRegistry::new(),
            tracker: SearchTracker::new(),
            line_index,
        };
        editor.refresh();
        tracing::debug!(
            language = %tables.name,
            version = %tables.version,
            coloring = ?editor.coloring,
            "editor session created"
        );
        Ok(editor)
    }

    /// Session using the checked-in Python tables.
    pub fn python(host: H, config: EditorConfig) -> Result<Self, CoreError> {
        Self::new(host, config, &LanguageTables::python())
    }

    /// The host buffer.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host. Text changes made here must be reported through
    /// [`Editor::handle_change`].
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consume the session and return the host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Session configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Line index as of the last processed change or indentation action.
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Classification spans.
    pub fn registry(&self) -> &HighlightRegistry {
        &self.registry
    }

    /// Search highlights.
    pub fn tracker(&self) -> &SearchTracker {
        &self.tracker
    }

    // ----- document -----

    /// Replace the whole document (new file / open file).
    ///
    /// Search highlights and remembered terms are dropped; the cursor, selection and scroll
    /// position return to the start.
    pub fn load(&mut self, text: &str) -> Result<(), CoreError> {
        let len = self.host.len_chars();
        self.host.replace_range(0, len, text)?;
        self.tracker.reset();
        self.registry.clear();
        self.line_index = LineIndex::new(text);

        self.host.clear_selection();
        self.host.set_cursor(0);
        self.host.set_scroll_fraction(0.0);
        self.refresh();
        tracing::debug!(chars = self.line_index.char_count(), "loaded document");
        Ok(())
    }

    /// Replace `[start, end)` with `text` and process the change.
    pub fn edit(&mut self, start: usize, end: usize, text: &str) -> Result<TextDelta, CoreError> {
        let delta = self.host.replace_range(start, end, text)?;
        self.handle_change(&delta);
        Ok(delta)
    }

    /// Process a buffer change: move spans with the edit, prune stale search highlights and,
    /// with `reclassify_on_edit`, reclassify.
    pub fn handle_change(&mut self, delta: &TextDelta) {
        self.process_change(delta, self.config.reclassify_on_edit);
    }

    fn process_change(&mut self, delta: &TextDelta, reclassify: bool) {
        let text = self.host.text();
        self.line_index = LineIndex::new(&text);

        self.registry.apply_delta(delta);
        self.tracker.apply_delta(delta);
        self.tracker.validate(&self.host);

        if reclassify && self.coloring.is_enabled() {
            self.registry.reclassify(&text, &self.classifier);
        }
        tracing::trace!(
            edits = delta.edits.len(),
            chars = delta.after_char_count,
            "processed change"
        );
    }

    // ----- coloring -----

    /// Current coloring mode.
    pub fn coloring(&self) -> Coloring {
        self.coloring
    }

    /// Switch coloring on or off and apply the new mode. Returns the number of spans afterwards.
    pub fn set_coloring(&mut self, coloring: Coloring) -> usize {
        self.coloring = coloring;
        tracing::debug!(?coloring, "coloring switched");
        self.refresh()
    }

    /// Flip the coloring mode.
    pub fn toggle_coloring(&mut self) -> usize {
        let next = Coloring::from(!self.coloring.is_enabled());
        self.set_coloring(next)
    }

    /// Reclassify when coloring is enabled, clear otherwise. Returns the span count.
    pub fn refresh(&mut self) -> usize {
        if self.coloring.is_enabled() {
            self.reclassify()
        } else {
            self.registry.clear();
            0
        }
    }

    /// Recompute every classification span from the current text. Does nothing while coloring
    /// is disabled.
    pub fn reclassify(&mut self) -> usize {
        if !self.coloring.is_enabled() {
            return 0;
        }
        let text = self.host.text();
        self.registry.reclassify(&text, &self.classifier)
    }

    /// Remove every classification span. Returns how many were removed.
    pub fn clear_classification(&mut self) -> usize {
        self.registry.clear()
    }

    // ----- search -----

    /// Find `term` at or after the cursor, wrapping. An empty term clears the current match.
    pub fn find(&mut self, term: &str) -> FindOutcome {
        let text = self.host.text();
        let outcome = self.tracker.find(&text, self.host.cursor(), term);
        self.follow(outcome)
    }

    /// Next occurrence of the remembered find term after the cursor.
    pub fn find_next(&mut self) -> FindOutcome {
        let text = self.host.text();
        let outcome = self.tracker.find_next(&text, self.host.cursor());
        self.follow(outcome)
    }

    /// Previous occurrence of the remembered find term before the cursor.
    pub fn find_prev(&mut self) -> FindOutcome {
        let text = self.host.text();
        let outcome = self.tracker.find_prev(&text, self.host.cursor());
        self.follow(outcome)
    }

    fn follow(&mut self, outcome: FindOutcome) -> FindOutcome {
        if let FindOutcome::Found(m) = outcome {
            self.host.set_cursor(m.start);
            self.host.center_on(m.start);
        }
        outcome
    }

    /// Highlight every occurrence of `term`. An empty term clears the highlights.
    pub fn highlight_all(&mut self, term: &str) -> HighlightOutcome {
        let text = self.host.text();
        self.tracker.highlight_all(&text, term)
    }

    /// Remove all search highlights of both kinds.
    pub fn clear_all_highlights(&mut self) {
        self.tracker.clear_all_highlights();
        tracing::debug!("cleared search highlights");
    }

    /// Replace every occurrence of `find` with `replacement` in one block edit.
    ///
    /// On success `find` becomes the remembered find term, search highlights are cleared and
    /// the buffer is reclassified (or cleared when coloring is off).
    pub fn replace_all(
        &mut self,
        find: &str,
        replacement: &str,
    ) -> Result<ReplaceOutcome, CoreError> {
        if find.is_empty() {
            return Ok(ReplaceOutcome::NoTerm);
        }

        let text = self.host.text();
        let count = find_all(&text, find).len();
        if count == 0 {
            tracing::debug!(find, "replace-all found nothing");
            return Ok(ReplaceOutcome::NotFound);
        }
        self.tracker.set_find_term(find);

        let cursor = self.host.cursor();
        let len = self.host.len_chars();
        let replaced = text.replace(find, replacement);
        let delta = self.host.replace_range(0, len, &replaced)?;
        self.process_change(&delta, false);
        self.host.set_cursor(cursor);

        self.tracker.clear_all_highlights();
        self.refresh();
        tracing::debug!(find, replacement, count, "replace-all");
        Ok(ReplaceOutcome::Replaced { count })
    }

    // ----- indentation -----

    fn indent_unit(&self) -> IndentUnit {
        IndentUnit::new(self.config.indent_width)
    }

    /// Current host text, with the line index rebuilt from it. The host may have been edited
    /// without a change event reaching `handle_change` yet.
    fn snapshot(&mut self) -> String {
        let text = self.host.text();
        self.line_index = LineIndex::new(&text);
        text
    }

    /// Indent the selected lines, or insert one indent unit at the cursor.
    pub fn indent(&mut self) -> Result<BlockEdit, CoreError> {
        let text = self.snapshot();
        let edit = plan_indent(
            &text,
            &self.line_index,
            self.host.selection(),
            self.host.cursor(),
            self.indent_unit(),
        );
        self.apply_block(&edit)?;
        Ok(edit)
    }

    /// Outdent the selected lines, or remove leading spaces left of the cursor. Returns `None`
    /// when there was nothing to remove.
    pub fn outdent(&mut self) -> Result<Option<BlockEdit>, CoreError> {
        let text = self.snapshot();
        let Some(edit) = plan_outdent(
            &text,
            &self.line_index,
            self.host.selection(),
            self.host.cursor(),
            self.indent_unit(),
        ) else {
            return Ok(None);
        };
        self.apply_block(&edit)?;
        Ok(Some(edit))
    }

    fn apply_block(&mut self, edit: &BlockEdit) -> Result<(), CoreError> {
        let scroll = self.host.scroll_fraction();

        let delta = self
            .host
            .replace_range(edit.start, edit.end, &edit.replacement)?;
        let is_block = edit.selection.is_some();
        self.process_change(&delta, is_block || self.config.reclassify_on_edit);

        match edit.selection {
            Some((start, end)) => self.host.set_selection(start, end),
            None => self.host.clear_selection(),
        }
        self.host.set_cursor(edit.cursor);
        self.host.set_scroll_fraction(scroll);

        tracing::debug!(
            start = edit.start,
            end = edit.end,
            block = is_block,
            "applied indentation edit"
        );
        Ok(())
    }

    // ----- views -----

    /// Leading-space count per line.
    pub fn indent_gutter(&self) -> Vec<usize> {
        indent_gutter(&self.host.text())
    }

    /// Cursor line and line count.
    pub fn status(&self) -> StatusLine {
        let index = LineIndex::new(&self.host.text());
        StatusLine {
            line: index.line_of(self.host.cursor()),
            total_lines: index.line_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::search::SearchMatch;
    use notpad_lang::TokenClass;
    use pretty_assertions::assert_eq;

    fn editor(text: &str) -> Editor<Buffer> {
        Editor::python(Buffer::new(text), EditorConfig::default()).unwrap()
    }

    #[test]
    fn test_new_classifies() {
        let editor = editor("if x: pass");
        assert_eq!(editor.registry().spans_of(TokenClass::Keyword).len(), 2);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = EditorConfig {
            indent_width: 0,
            ..EditorConfig::default()
        };
        assert!(matches!(
            Editor::python(Buffer::new(""), config),
            Err(CoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_coloring_toggle() {
        let mut editor = editor("x = 1");
        assert_eq!(editor.toggle_coloring(), 0);
        assert!(editor.registry().is_empty());
        assert_eq!(editor.reclassify(), 0);
        assert_eq!(editor.toggle_coloring(), 1);
        assert_eq!(editor.coloring(), Coloring::Enabled);
    }

    #[test]
    fn test_find_moves_cursor_and_centers() {
        let mut editor = editor("a b a");
        editor.host_mut().set_cursor(1);
        assert_eq!(
            editor.find("a"),
            FindOutcome::Found(SearchMatch { start: 4, end: 5 })
        );
        assert_eq!(editor.host().cursor(), 4);
        assert_eq!(editor.host().centered_on(), Some(4));
    }

    #[test]
    fn test_edit_prunes_search_spans() {
        let mut editor = editor("foo bar foo");
        editor.highlight_all("foo");
        editor.edit(0, 3, "baz").unwrap();
        assert_eq!(
            editor.tracker().all_matches(),
            vec![SearchMatch { start: 8, end: 11 }]
        );
    }

    #[test]
    fn test_edit_shifts_classification() {
        let mut editor = editor("if x");
        editor.edit(0, 0, "  ").unwrap();
        let spans = editor.registry().spans_of(TokenClass::Keyword);
        assert_eq!((spans[0].start, spans[0].end), (2, 4));
    }

    #[test]
    fn test_reclassify_on_edit() {
        let config = EditorConfig {
            reclassify_on_edit: true,
            ..EditorConfig::default()
        };
        let mut editor = Editor::python(Buffer::new("x"), config).unwrap();
        editor.edit(1, 1, " = 42").unwrap();
        assert_eq!(editor.registry().spans_of(TokenClass::Number).len(), 1);
    }

    #[test]
    fn test_replace_all() {
        let mut editor = editor("foo bar foo");
        editor.highlight_all("bar");
        let outcome = editor.replace_all("foo", "print").unwrap();
        assert_eq!(outcome, ReplaceOutcome::Replaced { count: 2 });
        assert_eq!(editor.host().text(), "print bar print");
        assert!(editor.tracker().all_matches().is_empty());
        assert_eq!(editor.tracker().find_term(), Some("foo"));
        assert_eq!(editor.registry().spans_of(TokenClass::Builtin).len(), 2);
    }

    #[test]
    fn test_replace_all_not_found() {
        let mut editor = editor("abc");
        assert_eq!(editor.replace_all("z", "y").unwrap(), ReplaceOutcome::NotFound);
        assert_eq!(editor.replace_all("", "y").unwrap(), ReplaceOutcome::NoTerm);
        assert_eq!(editor.host().text(), "abc");
    }

    #[test]
    fn test_load_resets_search_state() {
        let mut editor = editor("foo");
        editor.find("foo");
        editor.highlight_all("foo");
        editor.load("return 1\n").unwrap();
        assert_eq!(editor.tracker().find_term(), None);
        assert_eq!(editor.tracker().highlight_term(), None);
        assert_eq!(editor.host().cursor(), 0);
        assert_eq!(editor.registry().len(), 2);
        assert_eq!(editor.status(), StatusLine { line: 1, total_lines: 2 });
    }

    #[test]
    fn test_status_after_unreported_host_edit() {
        let mut editor = editor("a");
        editor.host_mut().replace_range(0, 0, "x\ny\n").unwrap();
        editor.host_mut().set_cursor(3);
        assert_eq!(editor.status(), StatusLine { line: 2, total_lines: 3 });
    }

    #[test]
    fn test_status() {
        let mut editor = editor("a\nb\nc");
        editor.host_mut().set_cursor(3);
        let status = editor.status();
        assert_eq!(status, StatusLine { line: 2, total_lines: 3 });
        assert_eq!(status.to_string(), "Line: 2/3");
    }
}
