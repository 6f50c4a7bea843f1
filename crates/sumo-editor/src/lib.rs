//! # sumo-editor — Editing core for sumo
//!
//! This crate holds the editable-text core of the editor, independent of any
//! rendering or input handling:
//!
//! - **[`position`]** — `Position` (line, col) and `Range` types, 1-indexed
//! - **[`line_index`]** — line-start scanning, searching and splitting
//! - **[`buffer`]** — `TextBuffer`, a piece table over append-only stores
//! - **[`command`]** — reversible `Command`s and the `Executor` seam
//! - **[`history`]** — `CommandManager`, linear undo/redo over commands
//! - **[`movement`]** — stepping positions by char and by line
//! - **[`session`]** — buffer + history + insertion point, for front ends
//! - **[`options`]** — `:set`-style configuration
//!
//! Everything is single-threaded and synchronous. Wrap a [`Session`] (or a
//! buffer and its [`CommandManager`]) in one lock if several threads need it.

pub mod buffer;
pub mod command;
pub mod history;
pub mod line_index;
pub mod movement;
pub mod options;
pub mod position;
pub mod session;

pub use buffer::{BufferError, TextBuffer};
pub use command::{Apply, Command, Executor};
pub use history::CommandManager;
pub use options::Options;
pub use position::{Position, Range};
pub use session::Session;
