//! Undo/redo history — a linear log of commands with a movable cursor.
//!
//! Every executed [`Command`] is stored next to the commands that undo it,
//! computed from the buffer before the command runs. The cursor counts how many entries are
//! currently applied:
//!
//! ```text
//! entries:  [c0, c1, c2, c3]
//! applied:            ^ 3      undo → runs c2's inverse, applied = 2
//!                              redo → runs c3's forward, applied = 4
//! ```
//!
//! Executing a new command while some entries are undone discards them
//! (branching history is not supported). Undo and redo never consult the
//! buffer: they replay the stored commands through the executor.
//!
//! # Usage
//!
//! ```text
//! let mut history = CommandManager::new(Apply);
//! history.execute(&mut buffer, Command::add(pos, "text"))?;
//! history.undo(&mut buffer)?;
//! history.redo(&mut buffer)?;
//! ```

use tracing::debug;

use crate::buffer::{Result, TextBuffer};
use crate::command::{Command, Executor};
use crate::options::Options;

/// A recorded command and the commands that reverse it, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    forward: Command,
    inverse: Vec<Command>,
}

/// Undo/redo manager driving a buffer through an [`Executor`].
///
/// The manager does not own the buffer; it is passed to every call, the same
/// way edits reach it everywhere else. It does own the executor, so any state
/// the executor carries along with the buffer lives here too.
#[derive(Debug)]
pub struct CommandManager<E> {
    entries: Vec<Entry>,
    applied: usize,
    undo_levels: usize,
    executor: E,
}

impl<E: Executor> CommandManager<E> {
    /// Create an empty history with default [`Options`].
    #[must_use]
    pub fn new(executor: E) -> Self {
        Self::with_options(executor, &Options::default())
    }

    /// Create an empty history honouring `options.undo_levels`.
    #[must_use]
    pub const fn with_options(executor: E, options: &Options) -> Self {
        Self {
            entries: Vec::new(),
            applied: 0,
            undo_levels: options.undo_levels,
            executor,
        }
    }

    // -- Executor access ----------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    #[inline]
    pub const fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    // -- Editing ------------------------------------------------------------

    /// Execute `command` and record it.
    ///
    /// The inverse is computed first, from the buffer as it is now. Then the
    /// executor applies the command; only if that succeeds are the undone
    /// entries discarded and the new entry appended.
    ///
    /// # Errors
    ///
    /// Any error computing the inverse or executing the command. The history
    /// is unchanged in that case.
    pub fn execute(&mut self, buffer: &mut TextBuffer, command: Command) -> Result<()> {
        let inverse = command.inverse(buffer)?;
        self.executor.execute(buffer, &command)?;
        debug!(%command, "execute");

        self.entries.truncate(self.applied);
        self.entries.push(Entry {
            forward: command,
            inverse,
        });
        self.applied = self.entries.len();
        self.evict();
        Ok(())
    }

    /// Drop the oldest entries beyond `undo_levels`.
    fn evict(&mut self) {
        if self.entries.len() <= self.undo_levels {
            return;
        }
        let excess = self.entries.len() - self.undo_levels;
        self.entries.drain(..excess);
        self.applied -= excess;
        debug!(excess, kept = self.entries.len(), "history evicted");
    }

    /// Undo the most recent command. Returns `false` if there was nothing to
    /// undo.
    ///
    /// # Errors
    ///
    /// Any error the executor reports.
    pub fn undo(&mut self, buffer: &mut TextBuffer) -> Result<bool> {
        self.undo_by(buffer, 1)
    }

    /// Undo the `count` most recent commands.
    ///
    /// If fewer than `count` commands are applied the request is a silent
    /// no-op and `false` is returned.
    ///
    /// # Errors
    ///
    /// Any error the executor reports. Commands undone before the failure
    /// stay undone.
    pub fn undo_by(&mut self, buffer: &mut TextBuffer, count: usize) -> Result<bool> {
        if count == 0 || count > self.applied {
            return Ok(false);
        }
        for _ in 0..count {
            let entry = &self.entries[self.applied - 1];
            for command in &entry.inverse {
                self.executor.execute(buffer, command)?;
            }
            self.applied -= 1;
        }
        debug!(count, applied = self.applied, "undo");
        Ok(true)
    }

    /// Redo the most recently undone command. Returns `false` if there was
    /// nothing to redo.
    ///
    /// # Errors
    ///
    /// Any error the executor reports.
    pub fn redo(&mut self, buffer: &mut TextBuffer) -> Result<bool> {
        self.redo_by(buffer, 1)
    }

    /// Redo the next `count` undone commands.
    ///
    /// If fewer than `count` commands are undone the request is a silent
    /// no-op and `false` is returned, as with [`undo_by`](Self::undo_by).
    ///
    /// # Errors
    ///
    /// Any error the executor reports. Commands redone before the failure
    /// stay redone.
    pub fn redo_by(&mut self, buffer: &mut TextBuffer, count: usize) -> Result<bool> {
        if count == 0 || self.applied + count > self.entries.len() {
            return Ok(false);
        }
        for _ in 0..count {
            let entry = &self.entries[self.applied];
            self.executor.execute(buffer, &entry.forward)?;
            self.applied += 1;
        }
        debug!(count, applied = self.applied, "redo");
        Ok(true)
    }

    /// Forget every entry. The buffer is not touched.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.applied = 0;
    }

    // -- Queries ------------------------------------------------------------

    /// True if there are commands that can be undone.
    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.applied > 0
    }

    /// True if there are commands that can be redone.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    /// Number of commands that can be undone.
    #[must_use]
    pub const fn undo_count(&self) -> usize {
        self.applied
    }

    /// Number of commands that can be redone.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.entries.len() - self.applied
    }

    /// Number of recorded entries, applied or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The forward commands of every applied entry, oldest first.
    pub fn applied_commands(&self) -> impl Iterator<Item = &Command> {
        self.entries[..self.applied].iter().map(|entry| &entry.forward)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
