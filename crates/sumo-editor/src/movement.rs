//! Insertion-point movement.
//!
//! Pure functions that step a [`Position`] one char or one line through a
//! [`TextBuffer`]. Each returns `None` when the move would leave the
//! document, so callers can keep the old position without a bounds check of
//! their own. Horizontal moves wrap across line ends; vertical moves clamp
//! the column to the target line (`line_length + 1` is the furthest column,
//! just past the last char).
//!
//! The functions assume `p` is a valid position in `buf`. A stale position
//! yields `None` rather than an error.

use crate::buffer::TextBuffer;
use crate::position::Position;

/// One char left, wrapping to the end of the previous line.
#[must_use]
pub fn move_left(buf: &TextBuffer, p: Position) -> Option<Position> {
    if p.col > 1 {
        return Some(Position::new(p.line, p.col - 1));
    }
    if p.line > 1 {
        let len = buf.line_length(p.line - 1).ok()?;
        return Some(Position::new(p.line - 1, len + 1));
    }
    None
}

/// One char right, wrapping to the start of the next line.
#[must_use]
pub fn move_right(buf: &TextBuffer, p: Position) -> Option<Position> {
    let len = buf.line_length(p.line).ok()?;
    if p.col <= len {
        return Some(Position::new(p.line, p.col + 1));
    }
    if p.line < buf.line_count() {
        return Some(Position::new(p.line + 1, 1));
    }
    None
}

/// One line up, clamping the column.
#[must_use]
pub fn move_up(buf: &TextBuffer, p: Position) -> Option<Position> {
    if p.line <= 1 {
        return None;
    }
    clamped(buf, p.line - 1, p.col)
}

/// One line down, clamping the column.
#[must_use]
pub fn move_down(buf: &TextBuffer, p: Position) -> Option<Position> {
    if p.line >= buf.line_count() {
        return None;
    }
    clamped(buf, p.line + 1, p.col)
}

fn clamped(buf: &TextBuffer, line: usize, col: usize) -> Option<Position> {
    let len = buf.line_length(line).ok()?;
    Some(Position::new(line, col.min(len + 1)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    fn buf() -> TextBuffer {
        TextBuffer::new("hello\nhi\r\n\nworld")
    }

    // -- Horizontal ---------------------------------------------------------

    #[test]
    fn left_within_line() {
        assert_eq!(move_left(&buf(), pos(1, 3)), Some(pos(1, 2)));
    }

    #[test]
    fn left_wraps_to_previous_line_end() {
        assert_eq!(move_left(&buf(), pos(2, 1)), Some(pos(1, 6)));
        // Line 2 ends with CRLF; the wrap lands before both chars.
        assert_eq!(move_left(&buf(), pos(3, 1)), Some(pos(2, 3)));
    }

    #[test]
    fn left_at_document_start() {
        assert_eq!(move_left(&buf(), Position::START), None);
    }

    #[test]
    fn right_within_line() {
        assert_eq!(move_right(&buf(), pos(1, 5)), Some(pos(1, 6)));
    }

    #[test]
    fn right_wraps_to_next_line() {
        assert_eq!(move_right(&buf(), pos(1, 6)), Some(pos(2, 1)));
        assert_eq!(move_right(&buf(), pos(3, 1)), Some(pos(4, 1)));
    }

    #[test]
    fn right_at_document_end() {
        assert_eq!(move_right(&buf(), pos(4, 6)), None);
    }

    #[test]
    fn right_on_stale_line() {
        assert_eq!(move_right(&buf(), pos(9, 1)), None);
    }

    // -- Vertical -----------------------------------------------------------

    #[test]
    fn up_clamps_column() {
        assert_eq!(move_up(&buf(), pos(4, 5)), Some(pos(3, 1)));
        assert_eq!(move_up(&buf(), pos(2, 2)), Some(pos(1, 2)));
    }

    #[test]
    fn up_at_first_line() {
        assert_eq!(move_up(&buf(), pos(1, 4)), None);
    }

    #[test]
    fn down_clamps_column() {
        assert_eq!(move_down(&buf(), pos(1, 6)), Some(pos(2, 3)));
    }

    #[test]
    fn down_at_last_line() {
        assert_eq!(move_down(&buf(), pos(4, 1)), None);
    }

    #[test]
    fn moves_in_empty_buffer() {
        let empty = TextBuffer::new("");
        assert_eq!(move_left(&empty, Position::START), None);
        assert_eq!(move_right(&empty, Position::START), None);
        assert_eq!(move_up(&empty, Position::START), None);
        assert_eq!(move_down(&empty, Position::START), None);
    }

    #[test]
    fn round_trip_through_every_position() {
        let b = buf();
        let mut forward = vec![Position::START];
        while let Some(next) = move_right(&b, *forward.last().unwrap()) {
            forward.push(next);
        }
        // 5 + 2 + 0 + 5 chars, plus one end-of-line slot on each of 4 lines.
        assert_eq!(forward.len(), 16);

        let mut backward = vec![*forward.last().unwrap()];
        while let Some(prev) = move_left(&b, *backward.last().unwrap()) {
            backward.push(prev);
        }
        backward.reverse();
        assert_eq!(forward, backward);
    }
}
