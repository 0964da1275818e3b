//! Block indent / outdent.
//!
//! Planning is pure: [`plan_indent`] and [`plan_outdent`] look at a text snapshot, its
//! [`LineIndex`], the selection and the cursor, and describe one atomic replacement as a
//! [`BlockEdit`]. The editor session applies it through its host.
//!
//! With a selection, both operations expand it to whole lines. A selection ending at column 0 of a
//! later line does not include that line.

use crate::line_index::LineIndex;
use crate::search::CharIndex;

/// One level of indentation: `width` space characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentUnit {
    width: usize,
}

impl IndentUnit {
    /// An indent unit of `width` spaces.
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    /// Width in spaces.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The unit as text.
    pub fn as_string(&self) -> String {
        " ".repeat(self.width)
    }
}

impl Default for IndentUnit {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_INDENT_WIDTH)
    }
}

/// An atomic replacement of `[start, end)` plus the selection and cursor to restore afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEdit {
    /// Start of the replaced range.
    pub start: usize,
    /// End of the replaced range (pre-edit offsets).
    pub end: usize,
    /// New text for the range.
    pub replacement: String,
    /// Selection to set after the edit, in post-edit offsets.
    pub selection: Option<(usize, usize)>,
    /// Cursor to set after the edit, in post-edit offsets.
    pub cursor: usize,
}

impl BlockEdit {
    fn block(start: usize, end: usize, replacement: String) -> Self {
        let new_end = start + replacement.chars().count();
        Self {
            start,
            end,
            replacement,
            selection: Some((start, new_end)),
            cursor: new_end,
        }
    }
}

/// Whole-line range covering `[sel_start, sel_end)`: start of the first line to the end of the
/// last line (newline excluded).
fn line_block(index: &LineIndex, sel_start: usize, sel_end: usize) -> (usize, usize) {
    let first = index.line_of(sel_start);
    let end_address = index.offset_to_address(sel_end);
    let mut last = end_address.line;
    if last > first && end_address.column == 0 {
        last -= 1;
    }
    let start = index.line_start(first).unwrap_or(0);
    let end = index.line_end(last).unwrap_or(index.char_count());
    (start, end)
}

fn normalized(selection: Option<(usize, usize)>) -> Option<(usize, usize)> {
    let (a, b) = selection?;
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    (start < end).then_some((start, end))
}

fn slice<'a>(text: &'a str, chars: &CharIndex, start: usize, end: usize) -> &'a str {
    &text[chars.char_to_byte(start)..chars.char_to_byte(end)]
}

/// Plan an indent.
///
/// With a selection every line of the expanded block, blank lines included, gets one unit
/// prepended and the new block is selected. Without one, a unit is inserted at the cursor.
pub fn plan_indent(
    text: &str,
    index: &LineIndex,
    selection: Option<(usize, usize)>,
    cursor: usize,
    unit: IndentUnit,
) -> BlockEdit {
    let prefix = unit.as_string();
    let Some((sel_start, sel_end)) = normalized(selection) else {
        let cursor = cursor.min(index.char_count());
        return BlockEdit {
            start: cursor,
            end: cursor,
            replacement: prefix,
            selection: None,
            cursor: cursor + unit.width(),
        };
    };

    let chars = CharIndex::new(text);
    let (start, end) = line_block(index, sel_start, sel_end);
    let replacement = slice(text, &chars, start, end)
        .split('\n')
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n");
    BlockEdit::block(start, end, replacement)
}

/// Plan an outdent. Returns `None` when there is nothing to remove.
///
/// With a selection, up to `unit.width()` leading spaces are removed from each line of the
/// expanded block. Without one, up to `unit.width()` spaces directly left of the cursor are
/// removed, only when everything between the line start and the cursor is spaces.
pub fn plan_outdent(
    text: &str,
    index: &LineIndex,
    selection: Option<(usize, usize)>,
    cursor: usize,
    unit: IndentUnit,
) -> Option<BlockEdit> {
    let chars = CharIndex::new(text);

    let Some((sel_start, sel_end)) = normalized(selection) else {
        let cursor = cursor.min(index.char_count());
        let line_start = index.line_start(index.line_of(cursor)).unwrap_or(0);
        let before = slice(text, &chars, line_start, cursor);
        if before.is_empty() || !before.chars().all(|c| c == ' ') {
            return None;
        }
        let remove = unit.width().min(cursor - line_start);
        return Some(BlockEdit {
            start: cursor - remove,
            end: cursor,
            replacement: String::new(),
            selection: None,
            cursor: cursor - remove,
        });
    };

    let (start, end) = line_block(index, sel_start, sel_end);
    let block = slice(text, &chars, start, end);
    let replacement = block
        .split('\n')
        .map(|line| {
            let spaces = line.bytes().take_while(|&b| b == b' ').count();
            &line[spaces.min(unit.width())..]
        })
        .collect::<Vec<_>>()
        .join("\n");
    if replacement == block {
        return None;
    }
    Some(BlockEdit::block(start, end, replacement))
}

/// Leading-space count of every line. Tabs are skipped without ending the run.
pub fn indent_gutter(text: &str) -> Vec<usize> {
    text.split('\n')
        .map(|line| {
            line.chars()
                .filter(|&c| c != '\t')
                .take_while(|&c| c == ' ')
                .count()
        })
        .collect()
}
