//! Logical line index.
//!
//! Maps between flat character offsets and `(line, column)` addresses over one buffer snapshot.
//! The index is a prefix array of line-start offsets; lookups are a binary search over it.
//! An index describes exactly the text it was built from: rebuild it after every buffer change.

/// A `(line, column)` address.
///
/// `line` is 1-based, `column` is a 0-based character count from the line start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    /// 1-based line number.
    pub line: usize,
    /// 0-based column in characters.
    pub column: usize,
}

impl Address {
    /// Create a new address.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.line, self.column)
    }
}

/// Line-start prefix array over a buffer snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// `line_starts[i]` is the char offset of line `i + 1`. Always non-empty, starts with 0.
    line_starts: Vec<usize>,
    char_count: usize,
}

impl LineIndex {
    /// Build the index for `text`.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut char_count = 0;
        for ch in text.chars() {
            char_count += 1;
            if ch == '\n' {
                line_starts.push(char_count);
            }
        }
        Self {
            line_starts,
            char_count,
        }
    }

    /// Number of lines (an empty buffer has one empty line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Total character count of the indexed text.
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Start offset of 1-based `line`.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line.checked_sub(1)?).copied()
    }

    /// End offset of 1-based `line`: the offset of its terminating `\n`, or the buffer end.
    pub fn line_end(&self, line: usize) -> Option<usize> {
        let idx = line.checked_sub(1)?;
        if idx >= self.line_starts.len() {
            return None;
        }
        Some(match self.line_starts.get(idx + 1) {
            Some(next) => next - 1,
            None => self.char_count,
        })
    }

    /// Length of 1-based `line` in characters, excluding the newline.
    pub fn line_len(&self, line: usize) -> Option<usize> {
        Some(self.line_end(line)? - self.line_start(line)?)
    }

    /// Address of `offset`. Offsets past the end clamp to the end of the buffer.
    pub fn offset_to_address(&self, offset: usize) -> Address {
        let offset = offset.min(self.char_count);
        // line_starts[0] == 0 <= offset, so the partition point is at least 1.
        let idx = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Address {
            line: idx + 1,
            column: offset - self.line_starts[idx],
        }
    }

    /// Offset of `address`, or `None` if the line does not exist or the column is past the
    /// line's end.
    pub fn address_to_offset(&self, address: Address) -> Option<usize> {
        let start = self.line_start(address.line)?;
        let len = self.line_len(address.line)?;
        (address.column <= len).then_some(start + address.column)
    }

    /// 1-based line containing `offset` (clamped).
    pub fn line_of(&self, offset: usize) -> usize {
        self.offset_to_address(offset).line
    }
}
