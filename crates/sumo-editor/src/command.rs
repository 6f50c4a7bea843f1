//! Edit commands — the reversible unit recorded by the history.
//!
//! A [`Command`] is either an insertion or a deletion. Its inverse is derived
//! from the buffer *before* the command runs:
//!
//! | Command                  | Inverse                                     |
//! |--------------------------|---------------------------------------------|
//! | `Add { position, text }` | `Delete { position .. extent_of(text) }`    |
//! | `Delete { range }`       | `Add { range.start, content_in_range }`     |
//!
//! An edit can also bring a lone `\r` and a `\n` together into one `\r\n`
//! break: inserting text that opens with `\n` right after a `\r`, inserting
//! text that ends with `\r` right before a `\n`, or deleting everything
//! between the two. No position points between the halves of a `\r\n`, so
//! the table above cannot pull them apart again. For those edits the inverse
//! is two commands instead: delete the surrounding lines as they read after
//! the edit, then add them back as they read before it.
//!
//! Commands are applied through an [`Executor`], the seam between the
//! history and whatever owns the buffer. An executor may fan a command out to
//! more state than the buffer alone (see [`Session`](crate::session::Session)).

use std::fmt;

use crate::buffer::{Result, TextBuffer};
use crate::line_index::last_position;
use crate::position::{Position, Range};

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A reversible buffer edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert `text` at `position`.
    Add { position: Position, text: String },

    /// Remove the text in `range`.
    Delete { range: Range },
}

impl Command {
    #[must_use]
    pub fn add(position: Position, text: impl Into<String>) -> Self {
        Self::Add {
            position,
            text: text.into(),
        }
    }

    #[must_use]
    pub const fn delete(range: Range) -> Self {
        Self::Delete { range }
    }

    /// The commands that undo `self`, in order, computed against `buffer`
    /// as it is before `self` is applied.
    ///
    /// # Errors
    ///
    /// Any error resolving the command's positions or reading its range.
    pub fn inverse(&self, buffer: &TextBuffer) -> Result<Vec<Self>> {
        let (start, end, removed, inserted) = match self {
            Self::Add { position, text } => (*position, *position, String::new(), text.as_str()),
            Self::Delete { range } => {
                (range.start, range.end, buffer.content_in_range(*range)?, "")
            }
        };

        let cr_before = buffer.char_before(start)? == Some('\r');
        let lf_after = buffer.char_at(end)? == Some('\n');
        let (joins_front, joins_back) = match self {
            Self::Add { text, .. } => (
                cr_before && text.starts_with('\n'),
                lf_after && text.ends_with('\r'),
            ),
            Self::Delete { .. } => (cr_before && lf_after, cr_before && lf_after),
        };

        if !joins_front && !joins_back {
            return Ok(vec![match self {
                Self::Add { position, text } => Self::Delete {
                    range: Range::new(*position, extent_of(*position, text)),
                },
                Self::Delete { range } => Self::Add {
                    position: range.start,
                    text: removed,
                },
            }]);
        }

        // Widen to whole lines on each joined side, so neither end of the
        // replaced span sits inside a `\r\n`.
        let from = if joins_front {
            Position::new(start.line - 1, 1)
        } else {
            start
        };
        let to = if joins_back {
            Position::new(end.line + 1, 1)
        } else {
            end
        };
        let head = buffer.content_in_range(Range::new(from, start))?;
        let tail = buffer.content_in_range(Range::new(end, to))?;
        let after = format!("{head}{inserted}{tail}");
        Ok(vec![
            Self::delete(Range::new(from, extent_of(from, &after))),
            Self::add(from, format!("{head}{removed}{tail}")),
        ])
    }

    /// Apply the command to `buffer`.
    ///
    /// # Errors
    ///
    /// Whatever [`TextBuffer::insert`] or [`TextBuffer::delete`] reports.
    pub fn apply(&self, buffer: &mut TextBuffer) -> Result<()> {
        match self {
            Self::Add { position, text } => buffer.insert(*position, text),
            Self::Delete { range } => buffer.delete(*range),
        }
    }

    /// Where an insertion point ends up once the command has been applied:
    /// just past the inserted text, or at the start of the deleted range.
    #[must_use]
    pub fn landing(&self) -> Position {
        match self {
            Self::Add { position, text } => extent_of(*position, text),
            Self::Delete { range } => range.start,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { position, text } => write!(f, "add {text:?} at {position}"),
            Self::Delete { range } => write!(f, "delete {range}"),
        }
    }
}

/// The position just past `text` once it is inserted at `position`.
#[must_use]
pub fn extent_of(position: Position, text: &str) -> Position {
    position.advance_by(last_position(text))
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

/// Applies commands on behalf of the history.
///
/// Implemented for any `FnMut(&mut TextBuffer, &Command) -> Result<()>`, so a
/// closure works wherever an executor is expected.
pub trait Executor {
    /// Apply `command` to `buffer` and to any state that follows it.
    ///
    /// # Errors
    ///
    /// Any buffer error. The history treats a failed command as not applied.
    fn execute(&mut self, buffer: &mut TextBuffer, command: &Command) -> Result<()>;
}

impl<F> Executor for F
where
    F: FnMut(&mut TextBuffer, &Command) -> Result<()>,
{
    fn execute(&mut self, buffer: &mut TextBuffer, command: &Command) -> Result<()> {
        self(buffer, command)
    }
}

/// The plain executor: applies each command to the buffer and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct Apply;

impl Executor for Apply {
    fn execute(&mut self, buffer: &mut TextBuffer, command: &Command) -> Result<()> {
        command.apply(buffer)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
