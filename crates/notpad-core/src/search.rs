//! Text search helpers.
//!
//! Plain, case-sensitive substring search over a UTF-8 `&str`, using **character offsets** (not
//! byte offsets) for all public inputs and outputs.

/// A match, expressed as a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl SearchMatch {
    /// Returns the length of the match in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the end of the buffer.
    Forward,
    /// Towards the start of the buffer.
    Backward,
}

/// Char <-> byte offset table for one string.
#[derive(Debug)]
pub(crate) struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    pub(crate) fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .copied()
            .unwrap_or(self.text_len)
    }

    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }
}

fn to_match(index: &CharIndex, start_byte: usize, term: &str) -> SearchMatch {
    let start = index.byte_to_char(start_byte);
    let end = index.byte_to_char(start_byte + term.len());
    SearchMatch { start, end }
}

/// First occurrence of `term` starting at or after `from`.
///
/// Returns `None` if there is no match or `term` is empty.
pub fn find_forward(text: &str, term: &str, from: usize) -> Option<SearchMatch> {
    if term.is_empty() {
        return None;
    }
    let index = CharIndex::new(text);
    let from_byte = index.char_to_byte(from);
    let found = text[from_byte..].find(term)?;
    Some(to_match(&index, from_byte + found, term))
}

/// Last occurrence of `term` starting strictly before `before`.
///
/// Overlapping occurrences are considered (`"aa"` in `"aaa"` can match at 1).
pub fn find_backward(text: &str, term: &str, before: usize) -> Option<SearchMatch> {
    if term.is_empty() || before == 0 {
        return None;
    }
    let index = CharIndex::new(text);
    let term_chars = term.chars().count();
    // A match starting at `before - 1` ends at `before - 1 + term_chars`.
    let limit = (before - 1 + term_chars).min(index.char_count());
    let limit_byte = index.char_to_byte(limit);
    let found = text[..limit_byte].rfind(term)?;
    Some(to_match(&index, found, term))
}

/// All non-overlapping occurrences of `term`, left to right. Each scan resumes at the end of
/// the previous match.
pub fn find_all(text: &str, term: &str) -> Vec<SearchMatch> {
    if term.is_empty() {
        return Vec::new();
    }
    let index = CharIndex::new(text);
    text.match_indices(term)
        .map(|(byte, _)| to_match(&index, byte, term))
        .collect()
}

/// Search from `from` in `direction`, optionally wrapping to the opposite end of the buffer.
///
/// Forward search includes a match starting at `from`; backward search only considers matches
/// starting before `from`.
pub fn search(
    text: &str,
    term: &str,
    from: usize,
    direction: Direction,
    wrap: bool,
) -> Option<SearchMatch> {
    match direction {
        Direction::Forward => find_forward(text, term, from)
            .or_else(|| wrap.then(|| find_forward(text, term, 0)).flatten()),
        Direction::Backward => find_backward(text, term, from).or_else(|| {
            wrap.then(|| find_backward(text, term, text.chars().count()))
                .flatten()
        }),
    }
}
