//! File load/save mechanics, kept out of the dispatcher so it can focus on
//! command semantics.
//!
//! Files are read as raw bytes, split on `\n`, and written back as the `\n`
//! join of the buffer entries — no normalization, so any file round-trips
//! byte-identically. Both directions report the byte count to the console,
//! as the command language requires.

use crate::input::Console;
use core_buffer::LineBuffer;
use core_state::{EdError, Session};
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, error};

/// Load a file into the session, replacing the buffer. With `new_filename`
/// the session's remembered filename is updated first; otherwise the
/// remembered one is used.
///
/// A modified buffer blocks the load unless `full_command` repeats the
/// previous command exactly (the confirm-by-repeat guard). A nonexistent
/// file is not an error: it reports `No such file or directory` and resets
/// to a fresh buffer so a later `w` can create the file. A file that exists
/// but cannot be read is fatal.
pub fn load_file(
    session: &mut Session,
    console: &mut dyn Console,
    new_filename: Option<&str>,
    full_command: &str,
) -> Result<(), EdError> {
    if session.modified && session.last_command != full_command {
        return Err(EdError::ModifiedBuffer);
    }
    if let Some(name) = new_filename {
        session.filename = Some(PathBuf::from(name));
    }
    let Some(path) = session.filename.clone() else {
        return Err(EdError::NoCurrentFilename);
    };

    match std::fs::read(&path) {
        Ok(bytes) => {
            let size = bytes.len();
            let text = String::from_utf8_lossy(&bytes);
            session.replace_with_loaded(LineBuffer::from_text(&text));
            debug!(target: "io", file = %path.display(), size_bytes = size, "file_read_ok");
            console.print(&size.to_string());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            console.print(&format!("{}: No such file or directory", path.display()));
            session.reset_for_new_file();
            Ok(())
        }
        Err(e) => {
            error!(target: "io", ?e, file = %path.display(), "file_open_error");
            Err(EdError::FileUnreadable)
        }
    }
}

/// Write the buffer to disk, updating the remembered filename first when one
/// is supplied. Clears the modified flag and returns the byte count on
/// success.
pub fn save_file(
    session: &mut Session,
    console: &mut dyn Console,
    new_filename: Option<&str>,
) -> Result<usize, EdError> {
    if let Some(name) = new_filename {
        session.filename = Some(PathBuf::from(name));
    }
    let Some(path) = session.filename.clone() else {
        return Err(EdError::NoCurrentFilename);
    };

    let content = session.buffer.to_text();
    match std::fs::write(&path, content.as_bytes()) {
        Ok(()) => {
            session.modified = false;
            debug!(target: "io", file = %path.display(), size_bytes = content.len(), "file_write_ok");
            console.print(&content.len().to_string());
            Ok(content.len())
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            Err(EdError::PermissionDenied(path.display().to_string()))
        }
        Err(e) => {
            error!(target: "io", ?e, file = %path.display(), "file_write_error");
            Err(EdError::FileWrite)
        }
    }
}
