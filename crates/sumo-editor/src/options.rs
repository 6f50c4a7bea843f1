//! Editing-core options — the `:set` layer.
//!
//! Parses `:set`-style directives and applies them to an [`Options`] value.
//! The options themselves are read by the
//! [`CommandManager`](crate::history::CommandManager) when it is built.
//!
//! # Supported syntax
//!
//! | Syntax           | Effect                  |
//! |------------------|-------------------------|
//! | `:set option`    | Show the current value  |
//! | `:set option?`   | Show the current value  |
//! | `:set option=N`  | Assign a value          |
//! | `:set`           | Show changed options    |
//! | `:set all`       | Show all options        |
//!
//! # Option names
//!
//! | Full name    | Abbrev | Type    | Default |
//! |--------------|--------|---------|---------|
//! | `undolevels` | `ul`   | integer | 1000    |
//!
//! `undolevels` caps the number of commands the history keeps. When the cap
//! is exceeded the oldest entries are dropped; `0` turns recording off.

use thiserror::Error;

/// Errors produced when applying a [`SetDirective`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// A parsed `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `:set option` or `:set option?` — show the current value.
    Show(String),

    /// `:set option=value` — assign a value.
    Assign(String, String),

    /// `:set` with no arguments — show changed options.
    ShowChanged,

    /// `:set all` — show all options.
    ShowAll,
}

/// Returns `true` if `name` is a known option (full name or abbreviation).
#[must_use]
pub fn is_known_option(name: &str) -> bool {
    matches!(name, "undolevels" | "ul")
}

/// Parse the full `:set` arguments string into directives.
///
/// Multiple space-separated arguments are supported. An empty argument string
/// produces [`SetDirective::ShowChanged`].
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single `:set` argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }

    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }

    let name = arg.strip_suffix('?').unwrap_or(arg);
    SetDirective::Show(name.to_string())
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Option values for the editing core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of history entries kept.
    pub undo_levels: usize,
}

impl Options {
    pub const DEFAULT_UNDO_LEVELS: usize = 1000;

    /// Apply one directive.
    ///
    /// Returns the text a `Show*` directive would display, or `None` for an
    /// assignment.
    ///
    /// # Errors
    ///
    /// [`OptionError::Unknown`] for an unrecognized name,
    /// [`OptionError::InvalidValue`] when an assigned value does not parse.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::Show(name) => {
                if !is_known_option(name) {
                    return Err(OptionError::Unknown(name.clone()));
                }
                Ok(Some(self.describe_undo_levels()))
            }
            SetDirective::Assign(name, value) => {
                if !is_known_option(name) {
                    return Err(OptionError::Unknown(name.clone()));
                }
                self.undo_levels = value.parse().map_err(|_| OptionError::InvalidValue {
                    name: name.clone(),
                    value: value.clone(),
                })?;
                Ok(None)
            }
            SetDirective::ShowChanged => {
                if *self == Self::default() {
                    Ok(Some(String::new()))
                } else {
                    Ok(Some(self.describe_undo_levels()))
                }
            }
            SetDirective::ShowAll => Ok(Some(self.describe_undo_levels())),
        }
    }

    /// Parse and apply a whole `:set` argument string, collecting display
    /// output. Stops at the first error.
    ///
    /// # Errors
    ///
    /// The first error any directive produces.
    pub fn set(&mut self, args: &str) -> Result<Vec<String>, OptionError> {
        let mut shown = Vec::new();
        for directive in parse_set(args) {
            if let Some(text) = self.apply(&directive)? {
                shown.push(text);
            }
        }
        Ok(shown)
    }

    fn describe_undo_levels(&self) -> String {
        format!("undolevels={}", self.undo_levels)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            undo_levels: Self::DEFAULT_UNDO_LEVELS,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
