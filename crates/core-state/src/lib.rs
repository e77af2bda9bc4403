//! Editor session state: buffer, cursors, undo slot, and error kinds.
//!
//! Everything a command may read or mutate lives in one explicit [`Session`]
//! struct passed by reference into every component. The coupling is real and
//! deliberate: editing operations must see and adjust `next_line` while a
//! global command iterates, so the state travels together rather than hiding
//! in globals.

use core_buffer::LineBuffer;
use std::path::PathBuf;
use thiserror::Error;
use tracing::trace;

pub mod undo;
pub use undo::UndoSlot;

/// Every user-visible command failure. Display strings are the exact messages
/// the editor prints when error display (`H`) is toggled on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EdError {
    #[error("invalid address")]
    InvalidAddress,
    #[error("invalid range")]
    InvalidRange,
    #[error("invalid destination address")]
    InvalidDestination,
    #[error("unexpected address")]
    UnexpectedAddress,
    #[error("unexpected command suffix")]
    BadCommandSuffix,
    #[error("unknown command")]
    UnknownCommand,
    #[error("{0}")]
    RegexCompile(String),
    #[error("expected '/' after s command")]
    RegexNoSlash,
    #[error("expected '/' to start regular expression")]
    RegexMissingOpen,
    #[error("expected '/' to end regular expression")]
    RegexUnterminated,
    #[error("no match")]
    NoMatch,
    #[error("nothing to undo")]
    NoBackup,
    #[error("no current filename")]
    NoCurrentFilename,
    #[error("error while writing")]
    FileWrite,
    #[error("{0}: permission denied")]
    PermissionDenied(String),
    #[error("error: file may exist but couldn't read it")]
    FileUnreadable,
    #[error("warning: file modified")]
    ModifiedBuffer,
    #[error("global commands cannot be nested")]
    NestedGlobal,
}

impl EdError {
    /// Fatal errors terminate the process instead of being recorded as the
    /// session's last error. Editing must not proceed against a file that
    /// exists but cannot be read.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EdError::FileUnreadable)
    }
}

/// The whole mutable state of one editing session.
#[derive(Debug)]
pub struct Session {
    pub buffer: LineBuffer,
    /// 1-based default address target; 0 only for a just-initialized buffer.
    pub current_line: usize,
    /// 1-based auxiliary cursor driving global command iteration. Editing
    /// operations advance/rewind it so concurrent inserts and deletes never
    /// skip or double-visit a line.
    pub next_line: usize,
    /// Set while the global executor runs sub-commands; changes the empty
    /// command's behavior and rejects nested globals.
    pub running_global: bool,
    /// True after any state-saving (destructive) command; cleared on save.
    pub modified: bool,
    pub filename: Option<PathBuf>,
    /// The previous full command string, for the quit/load confirm-by-repeat
    /// guard.
    pub last_command: String,
    pub last_error: Option<EdError>,
    /// The `H` toggle: print full error messages after the `?` marker.
    pub print_errors: bool,
    pub undo: UndoSlot,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            buffer: LineBuffer::new(),
            current_line: 0,
            next_line: 0,
            running_global: false,
            modified: false,
            filename: None,
            last_command: String::new(),
            last_error: None,
            print_errors: false,
            undo: UndoSlot::default(),
        }
    }

    pub fn last_line(&self) -> usize {
        self.buffer.last_line()
    }

    /// Snapshot the live state into the undo slot and mark the buffer
    /// modified. Every destructive command calls this before mutating.
    pub fn save_state(&mut self) {
        self.modified = true;
        self.undo.record(&self.buffer, self.current_line);
    }

    /// Swap live state with the undo snapshot; undoing is itself undoable.
    pub fn undo_swap(&mut self) -> Result<(), EdError> {
        self.undo.swap(&mut self.buffer, &mut self.current_line)?;
        self.modified = true;
        Ok(())
    }

    /// Reset to an empty buffer, as after opening a nonexistent file. The
    /// remembered filename survives so a later `w` can create the file.
    pub fn reset_for_new_file(&mut self) {
        trace!(target: "state", "reset_for_new_file");
        self.buffer = LineBuffer::new();
        self.current_line = 0;
        self.next_line = 0;
        self.modified = false;
        self.undo.clear();
        self.last_command.clear();
    }

    /// Install freshly loaded file contents, invalidating the undo slot and
    /// moving the cursor to the last line.
    pub fn replace_with_loaded(&mut self, buffer: LineBuffer) {
        self.buffer = buffer;
        self.undo.clear();
        self.modified = false;
        self.current_line = self.buffer.last_line();
    }

    pub fn record_error(&mut self, err: EdError) {
        self.last_error = Some(err);
    }
}
