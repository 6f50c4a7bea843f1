//! Text position and range types.
//!
//! All coordinates are **1-indexed**. Line 1 is the first line, column 1 is
//! the first character. Columns count Unicode scalar values (chars), not bytes.
//! The column one past the last character of a line is a valid position: it is
//! where text gets appended to that line.
//!
//! Byte offsets into the piece table's stores never appear here; the buffer
//! translates a `Position` through [`TextBuffer::resolve`](crate::buffer::TextBuffer::resolve).

use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in a text buffer: (line, column), both 1-indexed.
///
/// # Ordering
///
/// Positions are ordered lexicographically: line first, then column. This
/// means `Position { line: 1, col: 50 }` < `Position { line: 2, col: 1 }`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// The start of every document — line 1, column 1.
    pub const START: Self = Self { line: 1, col: 1 };

    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// True for the first position of the document.
    #[inline]
    #[must_use]
    pub const fn is_start(self) -> bool {
        self.line == 1 && self.col == 1
    }

    /// Position just past `text` when it is inserted at `self`.
    ///
    /// `extent` is the standalone end of the text as computed by
    /// [`last_position`](crate::line_index::last_position). A single-line
    /// extent advances the column; a multi-line extent moves down and takes
    /// the trailing line's column.
    #[must_use]
    pub const fn advance_by(self, extent: Self) -> Self {
        if extent.line == 1 {
            Self::new(self.line, self.col + extent.col - 1)
        } else {
            Self::new(self.line + extent.line - 1, extent.col)
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open range in a text buffer: `[start, end)`.
///
/// `start` is inclusive, `end` is exclusive when extracting content, but both
/// ends are valid insertion anchors. `Range::new` does not reorder its input:
/// a range whose `end` precedes `start` is rejected by the buffer with
/// [`BufferError::InvalidRange`](crate::buffer::BufferError::InvalidRange).
/// Use [`Range::ordered`] when the endpoints come from a selection that may
/// have been dragged backwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[inline]
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a range from two arbitrary positions, swapping if needed so
    /// that `start <= end`.
    #[inline]
    #[must_use]
    pub fn ordered(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A zero-width range at the given position.
    #[inline]
    #[must_use]
    pub const fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// True when the range spans zero characters (`start == end`).
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start.line == self.end.line && self.start.col == self.end.col
    }

    /// True when `start <= end`.
    #[inline]
    #[must_use]
    pub fn is_ordered(self) -> bool {
        self.start <= self.end
    }

    /// True when the range starts and ends on the same line.
    #[inline]
    #[must_use]
    pub const fn is_single_line(self) -> bool {
        self.start.line == self.end.line
    }

    /// True when the given position falls within `[start, end)`.
    #[inline]
    #[must_use]
    pub fn contains(self, pos: Position) -> bool {
        pos >= self.start && pos < self.end
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Range({}:{} .. {}:{})",
            self.start.line, self.start.col, self.end.line, self.end.col
        )
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
