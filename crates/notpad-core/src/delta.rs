//! Structured text change deltas.
//!
//! Span holders (classification registry, search tracker) need to know *where* the buffer
//! changed to move their spans the way a display layer moves tags. A [`TextDelta`] carries that
//! information in **character offsets** without diffing old and new text.

/// A single text edit expressed in character offsets.
///
/// `start` is an offset in the document at the time this edit is applied. The deleted range is
/// `start..start + deleted_len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDeltaEdit {
    /// Start character offset of the edit.
    pub start: usize,
    /// Exact deleted text (may be empty).
    pub deleted_text: String,
    /// Exact inserted text (may be empty).
    pub inserted_text: String,
}

impl TextDeltaEdit {
    /// Length of `deleted_text` in characters.
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    /// Length of `inserted_text` in characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Exclusive end character offset in the pre-edit document.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.deleted_len())
    }
}

/// A structured description of a document text change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDelta {
    /// Character count before applying `edits`.
    pub before_char_count: usize,
    /// Character count after applying `edits`.
    pub after_char_count: usize,
    /// Ordered list of edits that transforms the "before" document into the "after" document.
    pub edits: Vec<TextDeltaEdit>,
}

impl TextDelta {
    /// A delta holding one edit.
    pub fn single(before_char_count: usize, edit: TextDeltaEdit) -> Self {
        let after_char_count = before_char_count - edit.deleted_len() + edit.inserted_len();
        Self {
            before_char_count,
            after_char_count,
            edits: vec![edit],
        }
    }

    /// Returns `true` if this delta contains no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}
