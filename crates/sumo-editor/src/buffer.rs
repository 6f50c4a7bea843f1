//! Text buffer — a piece table over two append-only stores.
//!
//! A `TextBuffer` never edits text in place. It keeps:
//!
//! - **original** — the text the buffer was created with, never modified
//! - **added** — every string ever inserted, appended in insertion order
//! - **pieces** — an ordered list of [`Piece`]s, each a slice of one store
//!
//! Concatenating every piece's slice, in order, yields the document. Inserts
//! append to `added` and splice a new piece in; deletes splice pieces out or
//! trim them. Because `added` only grows, a byte range handed out once stays
//! valid forever, which is what lets the [history](crate::history) replay
//! inverse commands long after the edit that produced them.
//!
//! # Coordinate system
//!
//! The public API speaks 1-indexed [`Position`]s whose columns count chars.
//! Piece offsets, lengths and line starts are byte offsets and stay private
//! to this module. [`resolve`](TextBuffer::resolve) is the one function that
//! translates between the two; every other operation goes through it.
//!
//! # Line accounting
//!
//! Each piece records the line starts of its own slice (see
//! [`line_index`](crate::line_index)). Edits can leave a `\r` at the end of
//! one piece right before a `\n` that opens the next; in the document that
//! pair is a single `\r\n` break, so the `\r` piece's final line start is
//! not counted. Line structure therefore depends on the content alone, never
//! on how it happens to be split into pieces.

use std::fmt;

use thiserror::Error;
use tracing::trace;

use crate::line_index::{self, line_starts, locate, terminator_len};
use crate::position::{Position, Range};

pub type Result<T> = std::result::Result<T, BufferError>;

/// Errors produced by position-based buffer operations.
///
/// Both variants mean the caller handed over a position that does not belong
/// to the current document (usually one computed before an earlier edit).
/// Retrying is never meaningful.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("position {position} is out of bounds")]
    OutOfBounds { position: Position },
    #[error("invalid range: end {end} is before start {start}")]
    InvalidRange { start: Position, end: Position },
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// Which store a piece slices into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Original,
    Added,
}

/// A contiguous slice of one store.
///
/// `line_starts` holds, relative to `offset`, the byte offset of the first
/// byte after each line break inside the slice. Every value lies in
/// `1..=len` and the list is strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    source: Source,
    offset: usize,
    len: usize,
    line_starts: Vec<usize>,
}

impl Piece {
    #[must_use]
    const fn new(source: Source, offset: usize, len: usize, line_starts: Vec<usize>) -> Self {
        Self {
            source,
            offset,
            len,
            line_starts,
        }
    }

    /// The store this piece reads from.
    #[inline]
    #[must_use]
    pub const fn source(&self) -> Source {
        self.source
    }

    /// Byte offset of the slice within its store.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Byte length of the slice.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length slice. The buffer never retains one.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Line starts of the slice, relative to [`offset`](Self::offset).
    ///
    /// These describe the slice on its own. A trailing `\r` that meets a
    /// `\n` in the next piece still shows its line start here.
    #[inline]
    #[must_use]
    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }

    /// Split at byte `cut` into the parts before and after it.
    fn split(&self, cut: usize) -> (Self, Self) {
        let (left, right) = line_index::split_at(&self.line_starts, cut);
        (
            Self::new(self.source, self.offset, cut, left),
            Self::new(self.source, self.offset + cut, self.len - cut, right),
        )
    }

    /// The first `cut` bytes of this piece.
    fn head(&self, cut: usize) -> Self {
        Self::new(
            self.source,
            self.offset,
            cut,
            line_index::prefix_up_to(&self.line_starts, cut).to_vec(),
        )
    }

    /// Everything from byte `cut` onwards.
    fn tail(&self, cut: usize) -> Self {
        Self::new(
            self.source,
            self.offset + cut,
            self.len - cut,
            line_index::suffix_from(&self.line_starts, cut),
        )
    }
}

/// A resolved position: the piece holding it and a byte offset inside that
/// piece's slice.
///
/// `offset` may equal the piece's length (the position right after its last
/// byte). For the empty document, `(1,1)` resolves to piece 0, offset 0 even
/// though there are no pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub piece: usize,
    pub offset: usize,
}

// ---------------------------------------------------------------------------
// TextBuffer
// ---------------------------------------------------------------------------

/// A piece-table text buffer.
///
/// Created once from an initial string; afterwards only [`insert`] and
/// [`delete`] change it. Every read and write takes 1-indexed positions and
/// fails with [`BufferError::OutOfBounds`] when a position has no
/// corresponding offset. Failed calls leave the buffer untouched.
///
/// [`insert`]: Self::insert
/// [`delete`]: Self::delete
#[derive(Clone)]
pub struct TextBuffer {
    original: String,
    added: String,
    pieces: Vec<Piece>,
}

impl TextBuffer {
    // -- Construction -------------------------------------------------------

    /// Create a buffer whose whole content is one original piece.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let original = text.into();
        let pieces = if original.is_empty() {
            Vec::new()
        } else {
            vec![Piece::new(
                Source::Original,
                0,
                original.len(),
                line_starts(&original),
            )]
        };
        Self {
            original,
            added: String::new(),
            pieces,
        }
    }

    // -- Stores and pieces --------------------------------------------------

    /// The text the buffer was created with.
    #[inline]
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Every string ever inserted, concatenated in insertion order.
    #[inline]
    #[must_use]
    pub fn added(&self) -> &str {
        &self.added
    }

    /// The current piece sequence.
    #[inline]
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    #[inline]
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    fn store(&self, source: Source) -> &str {
        match source {
            Source::Original => &self.original,
            Source::Added => &self.added,
        }
    }

    /// The slice of its store that `piece` covers.
    fn text_of(&self, piece: &Piece) -> &str {
        &self.store(piece.source)[piece.offset..piece.offset + piece.len]
    }

    // -- Seams --------------------------------------------------------------

    /// True when piece `index` ends with `\r` and the next piece opens with
    /// `\n`, so the two form one `\r\n` break.
    fn joins_next(&self, index: usize) -> bool {
        let Some(next) = self.pieces.get(index + 1) else {
            return false;
        };
        self.text_of(&self.pieces[index]).ends_with('\r') && self.text_of(next).starts_with('\n')
    }

    /// Line starts of piece `index` as the document sees them.
    fn starts(&self, index: usize) -> &[usize] {
        let piece = &self.pieces[index];
        match piece.line_starts.split_last() {
            Some((&last, rest)) if last == piece.len && self.joins_next(index) => rest,
            _ => &piece.line_starts,
        }
    }

    /// Byte offset in piece `index` where its `k`-th line segment stops,
    /// before any terminator.
    fn segment_end(&self, index: usize, k: usize) -> usize {
        let piece = &self.pieces[index];
        match self.starts(index).get(k) {
            Some(&next) => next - terminator_len(self.text_of(piece), next),
            None if self.joins_next(index) => piece.len - 1,
            None => piece.len,
        }
    }

    // -- Sizes --------------------------------------------------------------

    /// True when the document has no content.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Document length in bytes.
    #[must_use]
    pub fn len_bytes(&self) -> usize {
        self.pieces.iter().map(|piece| piece.len).sum()
    }

    /// Document length in chars.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.pieces
            .iter()
            .map(|piece| self.text_of(piece).chars().count())
            .sum()
    }

    /// Number of lines. An empty buffer has one (empty) line, and a buffer
    /// ending with a line break has a trailing empty line.
    #[must_use]
    pub fn line_count(&self) -> usize {
        1 + (0..self.pieces.len())
            .map(|index| self.starts(index).len())
            .sum::<usize>()
    }

    // -- Position resolution ------------------------------------------------

    /// Translate a position into the piece that holds it and a byte offset
    /// inside that piece.
    ///
    /// Walks the pieces counting line breaks until it reaches the piece where
    /// `position.line` begins, then advances `position.col - 1` chars, moving
    /// on to later pieces while the line continues past a piece's end. The
    /// column may reach one past the line's last char but never into its
    /// terminator. When a position sits exactly on a piece seam, the earlier
    /// piece (at its end offset) wins.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] when the line does not exist, the column
    /// runs past the end of the line, or either coordinate is zero.
    pub fn resolve(&self, position: Position) -> Result<Location> {
        let out_of_bounds = BufferError::OutOfBounds { position };
        if position.line == 0 || position.col == 0 {
            return Err(out_of_bounds);
        }
        if self.pieces.is_empty() {
            return if position.is_start() {
                Ok(Location { piece: 0, offset: 0 })
            } else {
                Err(out_of_bounds)
            };
        }

        // Find the piece in which the target line begins. `k` is the line's
        // index among the piece's own breaks (0 = continues from before).
        let mut first_line = 1;
        let mut start = None;
        for index in 0..self.pieces.len() {
            let starts = self.starts(index);
            let k = position.line - first_line;
            if k <= starts.len() {
                let offset = if k == 0 { 0 } else { starts[k - 1] };
                start = Some((index, k, offset));
                break;
            }
            first_line += starts.len();
        }
        let (mut index, mut k, mut offset) = start.ok_or(out_of_bounds)?;

        let mut remaining = position.col - 1;
        loop {
            let text = self.text_of(&self.pieces[index]);
            let line_end = self.segment_end(index, k);

            let (bytes, chars) = advance_chars(&text[offset..line_end], remaining);
            offset += bytes;
            remaining -= chars;
            if remaining == 0 {
                return Ok(Location {
                    piece: index,
                    offset,
                });
            }

            // The column overshoots a terminated line, or the document ends.
            if k < self.starts(index).len() || index + 1 == self.pieces.len() {
                return Err(out_of_bounds);
            }
            index += 1;
            k = 0;
            offset = 0;
        }
    }

    /// Resolve both ends of a range, rejecting reversed ranges.
    fn resolve_range(&self, range: Range) -> Result<(Location, Location)> {
        if !range.is_ordered() {
            return Err(BufferError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        Ok((self.resolve(range.start)?, self.resolve(range.end)?))
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at `position`.
    ///
    /// The text is appended to the added store and a new piece covering it
    /// replaces the resolved piece together with that piece's prefix and
    /// suffix around the insertion offset. Empty fragments are dropped, so
    /// inserting at a piece boundary needs no special case.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] if `position` is not in the document.
    pub fn insert(&mut self, position: Position, text: &str) -> Result<()> {
        let at = self.resolve(position)?;
        if text.is_empty() {
            return Ok(());
        }

        let piece = Piece::new(Source::Added, self.added.len(), text.len(), line_starts(text));
        self.added.push_str(text);

        if self.pieces.is_empty() {
            self.pieces.push(piece);
        } else {
            let (head, tail) = self.pieces[at.piece].split(at.offset);
            let replacement: Vec<Piece> = [head, piece, tail]
                .into_iter()
                .filter(|fragment| !fragment.is_empty())
                .collect();
            self.pieces.splice(at.piece..=at.piece, replacement);
        }

        trace!(%position, bytes = text.len(), pieces = self.pieces.len(), "insert");
        Ok(())
    }

    /// Delete the text in `range`.
    ///
    /// The pieces from the one holding `range.start` through the one holding
    /// `range.end` are replaced by at most two fragments: the start piece's
    /// part before the range and the end piece's part after it. When both
    /// ends fall in the same piece the two fragments are cut from that one
    /// piece independently. An empty range is a no-op.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidRange`] if `range.end` precedes `range.start`,
    /// [`BufferError::OutOfBounds`] if either end is not in the document.
    pub fn delete(&mut self, range: Range) -> Result<()> {
        let (start, end) = self.resolve_range(range)?;
        if start == end {
            return Ok(());
        }

        let head = self.pieces[start.piece].head(start.offset);
        let tail = self.pieces[end.piece].tail(end.offset);
        let replacement: Vec<Piece> = [head, tail]
            .into_iter()
            .filter(|fragment| !fragment.is_empty())
            .collect();
        self.pieces.splice(start.piece..=end.piece, replacement);

        trace!(%range, pieces = self.pieces.len(), "delete");
        Ok(())
    }

    // -- Reading ------------------------------------------------------------

    /// The whole document. Allocates.
    #[must_use]
    pub fn content(&self) -> String {
        let mut content = String::with_capacity(self.len_bytes());
        for piece in &self.pieces {
            content.push_str(self.text_of(piece));
        }
        content
    }

    /// The text in `[range.start, range.end)`.
    ///
    /// # Errors
    ///
    /// Same as [`delete`](Self::delete).
    pub fn content_in_range(&self, range: Range) -> Result<String> {
        let (start, end) = self.resolve_range(range)?;
        if self.pieces.is_empty() {
            return Ok(String::new());
        }

        if start.piece == end.piece {
            let text = self.text_of(&self.pieces[start.piece]);
            return Ok(text[start.offset..end.offset].to_owned());
        }

        let mut content = String::new();
        content.push_str(&self.text_of(&self.pieces[start.piece])[start.offset..]);
        for piece in &self.pieces[start.piece + 1..end.piece] {
            content.push_str(self.text_of(piece));
        }
        content.push_str(&self.text_of(&self.pieces[end.piece])[..end.offset]);
        Ok(content)
    }

    /// The content of line `line`, without its terminator.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] if the line does not exist.
    pub fn content_in_line(&self, line: usize) -> Result<String> {
        let len = self.line_length(line)?;
        self.content_in_range(Range::new(
            Position::new(line, 1),
            Position::new(line, len + 1),
        ))
    }

    /// Number of chars on line `line`, excluding its terminator. A `\r\n`
    /// terminator is excluded whole.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] if the line does not exist.
    pub fn line_length(&self, line: usize) -> Result<usize> {
        let at = self.resolve(Position::new(line, 1))?;
        if self.pieces.is_empty() {
            return Ok(0);
        }

        // Count chars up to the first break, crossing pieces as needed.
        let (mut index, mut offset) = (at.piece, at.offset);
        let mut length = 0;
        loop {
            let text = self.text_of(&self.pieces[index]);
            let k = locate(self.starts(index), offset);
            length += text[offset..self.segment_end(index, k)].chars().count();
            if k < self.starts(index).len() || index + 1 == self.pieces.len() {
                return Ok(length);
            }
            index += 1;
            offset = 0;
        }
    }

    /// The char right before `position`, or `None` at the document start.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] if `position` is not in the document.
    pub fn char_before(&self, position: Position) -> Result<Option<char>> {
        let at = self.resolve(position)?;
        let Some(piece) = self.pieces.get(at.piece) else {
            return Ok(None);
        };
        if at.offset > 0 {
            return Ok(self.text_of(piece)[..at.offset].chars().next_back());
        }
        Ok(at
            .piece
            .checked_sub(1)
            .and_then(|prev| self.text_of(&self.pieces[prev]).chars().next_back()))
    }

    /// The char at `position`, or `None` at the document end.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] if `position` is not in the document.
    pub fn char_at(&self, position: Position) -> Result<Option<char>> {
        let at = self.resolve(position)?;
        let Some(piece) = self.pieces.get(at.piece) else {
            return Ok(None);
        };
        if at.offset < piece.len {
            return Ok(self.text_of(piece)[at.offset..].chars().next());
        }
        Ok(self
            .pieces
            .get(at.piece + 1)
            .and_then(|next| self.text_of(next).chars().next()))
    }

    /// Iterate over every line's content, without terminators.
    ///
    /// Yields exactly [`line_count`](Self::line_count) items.
    #[must_use]
    pub const fn lines(&self) -> Lines<'_> {
        Lines {
            buffer: self,
            piece: 0,
            offset: 0,
            done: false,
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("lines", &self.line_count())
            .field("bytes", &self.len_bytes())
            .field("pieces", &self.pieces.len())
            .field("added", &self.added.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

/// Iterator over line contents, created by [`TextBuffer::lines`].
#[derive(Debug)]
pub struct Lines<'a> {
    buffer: &'a TextBuffer,
    piece: usize,
    offset: usize,
    done: bool,
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }

        let buffer = self.buffer;
        let mut line = String::new();
        while let Some(piece) = buffer.pieces.get(self.piece) {
            let text = buffer.text_of(piece);
            let starts = buffer.starts(self.piece);
            let k = locate(starts, self.offset);
            line.push_str(&text[self.offset..buffer.segment_end(self.piece, k)]);
            if let Some(&next) = starts.get(k) {
                self.offset = next;
                if next == piece.len {
                    self.piece += 1;
                    self.offset = 0;
                }
                return Some(line);
            }
            self.piece += 1;
            self.offset = 0;
        }

        self.done = true;
        Some(line)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Advance through at most `max_chars` chars of `text`.
///
/// Returns the bytes consumed and the chars actually taken.
fn advance_chars(text: &str, max_chars: usize) -> (usize, usize) {
    let mut bytes = 0;
    let mut taken = 0;
    for ch in text.chars() {
        if taken == max_chars {
            break;
        }
        bytes += ch.len_utf8();
        taken += 1;
    }
    (bytes, taken)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
