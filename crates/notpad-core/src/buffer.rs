//! Host interface.
//!
//! The editor shell owns the text, the selection and the view. The engine reaches them through
//! [`TextHost`]; [`Buffer`] is a rope-backed implementation for tests and headless embedders.

use crate::delta::{TextDelta, TextDeltaEdit};
use crate::error::CoreError;
use ropey::Rope;

/// What the engine needs from the editor shell.
///
/// All offsets are character offsets into the newline-joined buffer.
pub trait TextHost {
    /// Full current content.
    fn text(&self) -> String;

    /// Buffer length in characters.
    fn len_chars(&self) -> usize;

    /// Text of `[start, end)`, clamped to the buffer.
    fn slice(&self, start: usize, end: usize) -> String;

    /// Atomically replace `[start, end)` with `text`.
    fn replace_range(&mut self, start: usize, end: usize, text: &str)
    -> Result<TextDelta, CoreError>;

    /// The selected range, if the selection is non-empty.
    fn selection(&self) -> Option<(usize, usize)>;

    /// Select `[start, end)`. An empty range clears the selection.
    fn set_selection(&mut self, start: usize, end: usize);

    /// Remove the selection.
    fn clear_selection(&mut self);

    /// Cursor offset.
    fn cursor(&self) -> usize;

    /// Move the cursor.
    fn set_cursor(&mut self, offset: usize);

    /// Vertical scroll position as a fraction of the document height.
    fn scroll_fraction(&self) -> f64;

    /// Restore a vertical scroll position.
    fn set_scroll_fraction(&mut self, fraction: f64);

    /// Ask the view to scroll so that `offset` is vertically centered.
    fn center_on(&mut self, offset: usize) {
        let _ = offset;
    }
}

/// Rope-backed [`TextHost`].
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    rope: Rope,
    selection: Option<(usize, usize)>,
    cursor: usize,
    scroll_fraction: f64,
    centered_on: Option<usize>,
}

impl Buffer {
    /// Create a buffer holding `text`, cursor at the start.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            ..Self::default()
        }
    }

    /// The last offset passed to [`TextHost::center_on`].
    pub fn centered_on(&self) -> Option<usize> {
        self.centered_on
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }
}

impl TextHost for Buffer {
    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn slice(&self, start: usize, end: usize) -> String {
        let len = self.rope.len_chars();
        let end = end.min(len);
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
    ) -> Result<TextDelta, CoreError> {
        let len = self.rope.len_chars();
        if start > end || end > len {
            return Err(CoreError::InvalidRange { start, end, len });
        }

        let deleted_text = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        self.rope.insert(start, text);

        let edit = TextDeltaEdit {
            start,
            deleted_text,
            inserted_text: text.to_string(),
        };
        let inserted = edit.inserted_len();

        // Right-gravity cursor: a cursor inside or at the start of the replaced range ends up
        // after the inserted text.
        if self.cursor >= end {
            self.cursor = self.cursor - (end - start) + inserted;
        } else if self.cursor >= start {
            self.cursor = start + inserted;
        }
        self.selection = None;

        Ok(TextDelta::single(len, edit))
    }

    fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.rope.len_chars();
        let (start, end) = (start.min(len), end.min(len));
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        self.selection = (start < end).then_some((start, end));
    }

    fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.rope.len_chars());
    }

    fn scroll_fraction(&self) -> f64 {
        self.scroll_fraction
    }

    fn set_scroll_fraction(&mut self, fraction: f64) {
        self.scroll_fraction = fraction.clamp(0.0, 1.0);
    }

    fn center_on(&mut self, offset: usize) {
        self.centered_on = Some(offset);
    }
}
