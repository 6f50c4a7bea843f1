//! Editing session — a buffer, its history and an insertion point.
//!
//! The session is what presentation and input layers talk to. They translate
//! key presses into calls like [`insert_text`](Session::insert_text) or
//! [`delete_char_before`](Session::delete_char_before) and read lines back
//! for display.
//!
//! Every edit, undo and redo goes through one executor, [`Tracker`], which
//! applies the command to the buffer and then moves the insertion point to
//! where the command leaves it. Undo therefore puts the insertion point back
//! at the edit it reverses without the history knowing insertion points
//! exist. (Undoing an edit that joined a `\r` and a `\n` rewrites whole
//! lines, and the point lands after them.)

use tracing::debug;

use crate::buffer::{Lines, Result, TextBuffer};
use crate::command::{Command, Executor};
use crate::history::CommandManager;
use crate::movement;
use crate::options::Options;
use crate::position::{Position, Range};

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Executor that applies commands and tracks the insertion point.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracker {
    point: Option<Position>,
}

impl Tracker {
    /// The insertion point, if one is set.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> Option<Position> {
        self.point
    }
}

impl Executor for Tracker {
    fn execute(&mut self, buffer: &mut TextBuffer, command: &Command) -> Result<()> {
        command.apply(buffer)?;
        self.point = Some(command.landing());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A single editing session over one document.
#[derive(Debug)]
pub struct Session {
    buffer: TextBuffer,
    history: CommandManager<Tracker>,
}

impl Session {
    /// Start a session on `text` with default options and no insertion point.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_options(text, &Options::default())
    }

    #[must_use]
    pub fn with_options(text: impl Into<String>, options: &Options) -> Self {
        Self {
            buffer: TextBuffer::new(text),
            history: CommandManager::with_options(Tracker::default(), options),
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    #[inline]
    #[must_use]
    pub const fn history(&self) -> &CommandManager<Tracker> {
        &self.history
    }

    /// Where typed text goes. `None` while the session is blurred.
    #[inline]
    #[must_use]
    pub const fn insertion_point(&self) -> Option<Position> {
        self.history.executor().point()
    }

    /// Line contents for display, without terminators.
    #[must_use]
    pub const fn lines(&self) -> Lines<'_> {
        self.buffer.lines()
    }

    // -- Focus --------------------------------------------------------------

    /// Place the insertion point at `position`.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`](crate::buffer::BufferError::OutOfBounds)
    /// if `position` is not in the document; the old point is kept.
    pub fn focus(&mut self, position: Position) -> Result<()> {
        self.buffer.resolve(position)?;
        self.history.executor_mut().point = Some(position);
        debug!(%position, "focus");
        Ok(())
    }

    /// Drop the insertion point. Edits are ignored until the next
    /// [`focus`](Self::focus).
    pub const fn blur(&mut self) {
        self.history.executor_mut().point = None;
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at the insertion point and move past it.
    ///
    /// Returns `false` without recording anything when there is no insertion
    /// point or `text` is empty.
    ///
    /// # Errors
    ///
    /// Any buffer error from applying the command.
    pub fn insert_text(&mut self, text: &str) -> Result<bool> {
        let Some(point) = self.insertion_point() else {
            return Ok(false);
        };
        if text.is_empty() {
            return Ok(false);
        }
        self.history
            .execute(&mut self.buffer, Command::add(point, text))?;
        Ok(true)
    }

    /// Insert a line break at the insertion point.
    ///
    /// # Errors
    ///
    /// Same as [`insert_text`](Self::insert_text).
    pub fn insert_line_break(&mut self) -> Result<bool> {
        self.insert_text("\n")
    }

    /// Delete the char before the insertion point, joining lines when the
    /// point is at a line start. Does nothing at the document start.
    ///
    /// # Errors
    ///
    /// Any buffer error from applying the command.
    pub fn delete_char_before(&mut self) -> Result<bool> {
        let Some(point) = self.insertion_point() else {
            return Ok(false);
        };
        let Some(start) = movement::move_left(&self.buffer, point) else {
            return Ok(false);
        };
        self.history
            .execute(&mut self.buffer, Command::delete(Range::new(start, point)))?;
        Ok(true)
    }

    /// Undo the last edit. The insertion point moves to where the undone
    /// edit happened.
    ///
    /// # Errors
    ///
    /// Any buffer error from replaying the inverse command.
    pub fn undo(&mut self) -> Result<bool> {
        self.history.undo(&mut self.buffer)
    }

    /// Redo the last undone edit.
    ///
    /// # Errors
    ///
    /// Any buffer error from replaying the command.
    pub fn redo(&mut self) -> Result<bool> {
        self.history.redo(&mut self.buffer)
    }

    // -- Movement -----------------------------------------------------------

    /// Move the insertion point one char left. Returns `false` if it could
    /// not move.
    pub fn move_left(&mut self) -> bool {
        self.step(movement::move_left)
    }

    /// Move the insertion point one char right.
    pub fn move_right(&mut self) -> bool {
        self.step(movement::move_right)
    }

    /// Move the insertion point one line up.
    pub fn move_up(&mut self) -> bool {
        self.step(movement::move_up)
    }

    /// Move the insertion point one line down.
    pub fn move_down(&mut self) -> bool {
        self.step(movement::move_down)
    }

    fn step(&mut self, motion: fn(&TextBuffer, Position) -> Option<Position>) -> bool {
        let Some(next) = self
            .insertion_point()
            .and_then(|point| motion(&self.buffer, point))
        else {
            return false;
        };
        self.history.executor_mut().point = Some(next);
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferError;
    use pretty_assertions::assert_eq;

    fn pos(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    fn focused(text: &str, at: Position) -> Session {
        let mut s = Session::new(text);
        s.focus(at).unwrap();
        s
    }

    // -- Focus --------------------------------------------------------------

    #[test]
    fn new_session_has_no_insertion_point() {
        let mut s = Session::new("abc");
        assert_eq!(s.insertion_point(), None);
        assert_eq!(s.insert_text("x"), Ok(false));
        assert_eq!(s.delete_char_before(), Ok(false));
        assert!(!s.move_right());
        assert_eq!(s.buffer().content(), "abc");
    }

    #[test]
    fn focus_rejects_invalid_position() {
        let mut s = focused("abc", pos(1, 2));
        assert_eq!(
            s.focus(pos(2, 1)),
            Err(BufferError::OutOfBounds { position: pos(2, 1) })
        );
        assert_eq!(s.insertion_point(), Some(pos(1, 2)));
    }

    #[test]
    fn blur_ignores_edits() {
        let mut s = focused("abc", pos(1, 1));
        s.blur();
        assert_eq!(s.insert_text("x"), Ok(false));
        assert!(s.history().is_empty());
    }

    // -- Typing -------------------------------------------------------------

    #[test]
    fn typing_advances_insertion_point() {
        let mut s = focused("", Position::START);
        s.insert_text("he").unwrap();
        s.insert_text("llo").unwrap();
        s.insert_line_break().unwrap();
        s.insert_text("world").unwrap();
        assert_eq!(s.buffer().content(), "hello\nworld");
        assert_eq!(s.insertion_point(), Some(pos(2, 6)));
        assert_eq!(s.history().len(), 4);
    }

    #[test]
    fn empty_text_is_not_recorded() {
        let mut s = focused("abc", pos(1, 4));
        assert_eq!(s.insert_text(""), Ok(false));
        assert!(s.history().is_empty());
    }

    #[test]
    fn delete_char_before_joins_lines() {
        let mut s = focused("ab\ncd", pos(2, 1));
        assert_eq!(s.delete_char_before(), Ok(true));
        assert_eq!(s.buffer().content(), "abcd");
        assert_eq!(s.insertion_point(), Some(pos(1, 3)));
    }

    #[test]
    fn delete_char_before_removes_crlf_whole() {
        let mut s = focused("ab\r\ncd", pos(2, 1));
        s.delete_char_before().unwrap();
        assert_eq!(s.buffer().content(), "abcd");
    }

    #[test]
    fn delete_char_before_at_start_is_noop() {
        let mut s = focused("abc", Position::START);
        assert_eq!(s.delete_char_before(), Ok(false));
        assert!(s.history().is_empty());
    }

    // -- Undo / redo --------------------------------------------------------

    #[test]
    fn undo_restores_content_and_insertion_point() {
        let mut s = focused("hello", pos(1, 6));
        s.insert_text(" world").unwrap();
        s.delete_char_before().unwrap();
        assert_eq!(s.buffer().content(), "hello worl");

        assert_eq!(s.undo(), Ok(true));
        assert_eq!(s.buffer().content(), "hello world");
        assert_eq!(s.insertion_point(), Some(pos(1, 12)));

        assert_eq!(s.undo(), Ok(true));
        assert_eq!(s.buffer().content(), "hello");
        assert_eq!(s.insertion_point(), Some(pos(1, 6)));

        assert_eq!(s.undo(), Ok(false));
    }

    #[test]
    fn backspace_joining_cr_and_lf_undoes_cleanly() {
        let mut s = focused("\rX\n", pos(2, 2));
        assert_eq!(s.delete_char_before(), Ok(true));
        assert_eq!(s.buffer().content(), "\r\n");
        assert_eq!(s.buffer().line_count(), 2);
        assert_eq!(s.insertion_point(), Some(pos(2, 1)));

        assert_eq!(s.undo(), Ok(true));
        assert_eq!(s.buffer().content(), "\rX\n");
        assert_eq!(s.buffer().line_count(), 3);
        assert_eq!(s.insertion_point(), Some(pos(3, 1)));
    }

    #[test]
    fn redo_replays_and_moves_insertion_point() {
        let mut s = focused("", Position::START);
        s.insert_text("a\nb").unwrap();
        s.undo().unwrap();
        assert_eq!(s.insertion_point(), Some(Position::START));
        assert_eq!(s.redo(), Ok(true));
        assert_eq!(s.buffer().content(), "a\nb");
        assert_eq!(s.insertion_point(), Some(pos(2, 2)));
        assert_eq!(s.redo(), Ok(false));
    }

    // -- Movement -----------------------------------------------------------

    #[test]
    fn movement_updates_insertion_point() {
        let mut s = focused("abc\nde", pos(1, 4));
        assert!(s.move_down());
        assert_eq!(s.insertion_point(), Some(pos(2, 3)));
        assert!(!s.move_down());
        assert!(s.move_left());
        assert!(s.move_up());
        assert_eq!(s.insertion_point(), Some(pos(1, 2)));
        assert!(s.move_right());
        assert_eq!(s.insertion_point(), Some(pos(1, 3)));
    }

    #[test]
    fn lines_for_display() {
        let s = Session::new("# title\n\nbody");
        let lines: Vec<String> = s.lines().collect();
        assert_eq!(lines, vec!["# title", "", "body"]);
    }

    #[test]
    fn undo_levels_option_applies() {
        let mut s = Session::with_options("", &Options { undo_levels: 1 });
        s.focus(Position::START).unwrap();
        s.insert_text("a").unwrap();
        s.insert_text("b").unwrap();
        assert_eq!(s.undo(), Ok(true));
        assert_eq!(s.undo(), Ok(false));
        assert_eq!(s.buffer().content(), "a");
    }
}
