//! Single-slot undo: one deep snapshot of (buffer, current line).
//!
//! Every destructive command records a snapshot before mutating. Undo swaps
//! the live state with the slot instead of overwriting it, so a second undo
//! reverts the first; there is no deeper history.

use crate::EdError;
use core_buffer::LineBuffer;
use std::mem;
use tracing::trace;

/// Deep copy of the editable state captured before a destructive command.
#[derive(Debug, Clone)]
pub struct Snapshot {
    lines: LineBuffer,
    current_line: usize,
}

/// Holder for the one undo snapshot. Empty until the first destructive
/// command runs, and emptied again when a file load replaces the buffer.
#[derive(Debug, Default)]
pub struct UndoSlot {
    backup: Option<Snapshot>,
}

impl UndoSlot {
    pub fn has_backup(&self) -> bool {
        self.backup.is_some()
    }

    /// Capture the live state, replacing any previous snapshot.
    pub fn record(&mut self, buffer: &LineBuffer, current_line: usize) {
        trace!(
            target: "state.undo",
            entries = buffer.entry_count(),
            current_line,
            "record_snapshot"
        );
        self.backup = Some(Snapshot {
            lines: buffer.clone(),
            current_line,
        });
    }

    /// Exchange the live state with the snapshot. Reports [`EdError::NoBackup`]
    /// when no snapshot has ever been taken.
    pub fn swap(
        &mut self,
        buffer: &mut LineBuffer,
        current_line: &mut usize,
    ) -> Result<(), EdError> {
        let snap = self.backup.as_mut().ok_or(EdError::NoBackup)?;
        mem::swap(&mut snap.lines, buffer);
        mem::swap(&mut snap.current_line, current_line);
        trace!(target: "state.undo", current_line = *current_line, "undo_swap");
        Ok(())
    }

    pub fn clear(&mut self) {
        self.backup = None;
    }
}
