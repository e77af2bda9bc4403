//! Line mutation operations: insert, delete, join, move, print.
//!
//! Every mutation keeps two cursor invariants. `current_line` lands where the
//! command language says it should (on the inserted/joined line, or on the
//! first surviving line after a delete). `next_line` — the global executor's
//! iteration cursor — is advanced past insertions before it and rewound over
//! deletions, so a running global command never skips or double-visits lines
//! while its sub-commands reshape the buffer underneath it.

use crate::input::{Console, LineInput};
use core_state::{EdError, Session};
use tracing::trace;

/// Validate a 1-based inclusive range against the buffer.
pub(crate) fn check_range(session: &Session, start: usize, end: usize) -> Result<(), EdError> {
    if start < 1 || end > session.last_line() {
        return Err(EdError::InvalidAddress);
    }
    if end < start {
        return Err(EdError::InvalidRange);
    }
    Ok(())
}

/// Print lines `[start, end]`, optionally with `<number>\t` prefixes.
pub(crate) fn print_range(
    session: &Session,
    console: &mut dyn Console,
    start: usize,
    end: usize,
    number_lines: bool,
) -> Result<(), EdError> {
    check_range(session, start, end)?;
    for line_num in start..=end {
        let text = session.buffer.text(line_num - 1).unwrap_or("");
        if number_lines {
            console.print(&format!("{line_num}\t{text}"));
        } else {
            console.print(text);
        }
    }
    Ok(())
}

/// Read lines from `input` until a lone `.` (or end of input) and splice them
/// in at the 0-based `index`, silently clamped to `[0, entry_count]`.
///
/// Appending at end-of-buffer forces a trailing newline: if the last typed
/// line is non-empty, the empty sentinel entry is added after it. Entering no
/// lines at all is a no-op.
pub(crate) fn read_and_insert_at(
    session: &mut Session,
    input: &mut dyn LineInput,
    index: usize,
) {
    let index = index.min(session.buffer.entry_count());
    let mut new_lines = Vec::new();
    while let Some(line) = input.read_line() {
        if line == "." {
            break;
        }
        new_lines.push(line);
    }
    if new_lines.is_empty() {
        return;
    }
    let typed = new_lines.len();
    if index == session.buffer.entry_count()
        && new_lines.last().is_some_and(|last| !last.is_empty())
    {
        new_lines.push(String::new());
    }
    let inserted = new_lines.len();
    trace!(target: "command.dispatch", index, typed, "insert_lines");

    session.buffer.insert(index, new_lines);
    session.current_line = (session.current_line + typed).min(session.last_line());
    if session.next_line > index {
        session.next_line += inserted;
    }
}

/// Remove lines `[start, end]`. `current_line` becomes `start` if that line
/// still exists, else the new last line.
pub(crate) fn delete_range(
    session: &mut Session,
    start: usize,
    end: usize,
) -> Result<(), EdError> {
    check_range(session, start, end)?;
    session.buffer.remove_range(start - 1, end);

    let span = end - start + 1;
    if start <= session.next_line && session.next_line <= end {
        session.next_line = start;
    } else if session.next_line > end {
        session.next_line -= span;
    }
    session.current_line = if start <= session.last_line() {
        start
    } else {
        session.last_line()
    };
    Ok(())
}

/// Concatenate lines `[start, end]` (no separator) into one line at `start`.
/// With no explicit range, joins the current line with the next one.
pub(crate) fn join_range(
    session: &mut Session,
    start: usize,
    end: usize,
    is_default_range: bool,
) -> Result<(), EdError> {
    let (start, end) = if is_default_range {
        (session.current_line, session.current_line + 1)
    } else {
        (start, end)
    };
    check_range(session, start, end)?;
    if start == end {
        return Ok(());
    }

    let mut joined = String::new();
    for line_num in start..=end {
        joined.push_str(session.buffer.text(line_num - 1).unwrap_or(""));
    }
    session.buffer.set_text(start - 1, joined);
    session.buffer.remove_range(start, end);

    let span = end - start;
    if start <= session.next_line && session.next_line <= end {
        session.next_line = start;
    } else if session.next_line > end {
        session.next_line -= span;
    }
    session.current_line = start;
    Ok(())
}

/// Move lines `[start, end]` to just after line `dst`. The destination may
/// not fall strictly inside the range being moved. Implemented as
/// copy-insert-after-`dst` then deletion of the original span, with the index
/// offset correction for destinations at or before the range.
pub(crate) fn move_lines(
    session: &mut Session,
    start: usize,
    end: usize,
    dst: usize,
) -> Result<(), EdError> {
    if start < 1 || end < start || session.last_line() < end {
        return Err(EdError::InvalidRange);
    }
    if (start <= dst && dst < end) || dst > session.last_line() {
        return Err(EdError::InvalidDestination);
    }

    let moving: Vec<String> = (start..=end)
        .map(|line_num| session.buffer.text(line_num - 1).unwrap_or("").to_string())
        .collect();
    let count = moving.len();
    session.buffer.insert(dst, moving);
    if session.next_line > dst {
        session.next_line += count;
    }

    // Deleting the original span: if the copies landed at or before it, the
    // originals shifted right by `count`.
    let offset = if dst > end { 0 } else { count };
    delete_range(session, start + offset, end + offset)?;
    session.current_line = (dst + offset).min(session.last_line());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptInput;
    use core_buffer::LineBuffer;

    fn session_with(text: &str) -> Session {
        let mut s = Session::new();
        s.replace_with_loaded(LineBuffer::from_text(text));
        s
    }

    #[test]
    fn delete_moves_current_line_to_start_of_gap() {
        let mut s = session_with("a\nb\nc\nd\n");
        delete_range(&mut s, 2, 3).unwrap();
        assert_eq!(s.buffer.to_text(), "a\nd\n");
        assert_eq!(s.current_line, 2);
    }

    #[test]
    fn delete_past_end_clamps_current_line() {
        let mut s = session_with("a\nb\n");
        delete_range(&mut s, 2, 2).unwrap();
        assert_eq!(s.current_line, 1);
    }

    #[test]
    fn delete_rejects_bad_ranges() {
        let mut s = session_with("a\nb\n");
        assert_eq!(delete_range(&mut s, 0, 1), Err(EdError::InvalidAddress));
        assert_eq!(delete_range(&mut s, 1, 3), Err(EdError::InvalidAddress));
        assert_eq!(delete_range(&mut s, 2, 1), Err(EdError::InvalidRange));
        assert_eq!(s.buffer.to_text(), "a\nb\n");
    }

    #[test]
    fn delete_inside_span_rewinds_next_line() {
        let mut s = session_with("a\nb\nc\nd\n");
        s.next_line = 3;
        delete_range(&mut s, 2, 4).unwrap();
        assert_eq!(s.next_line, 2);
    }

    #[test]
    fn delete_before_next_line_shifts_it_left() {
        let mut s = session_with("a\nb\nc\nd\n");
        s.next_line = 4;
        delete_range(&mut s, 1, 2).unwrap();
        assert_eq!(s.next_line, 2);
    }

    #[test]
    fn join_concatenates_without_separator() {
        let mut s = session_with("ab\ncd\nef\n");
        join_range(&mut s, 1, 3, false).unwrap();
        assert_eq!(s.buffer.to_text(), "abcdef\n");
        assert_eq!(s.current_line, 1);
    }

    #[test]
    fn join_line_count_shrinks_by_span_minus_one() {
        let mut s = session_with("a\nb\nc\nd\ne\n");
        join_range(&mut s, 2, 4, false).unwrap();
        assert_eq!(s.last_line(), 3);
        assert_eq!(s.buffer.text(1), Some("bcd"));
    }

    #[test]
    fn default_join_merges_current_with_next() {
        let mut s = session_with("a\nb\nc\n");
        s.current_line = 1;
        join_range(&mut s, 0, 0, true).unwrap();
        assert_eq!(s.buffer.to_text(), "ab\nc\n");
    }

    #[test]
    fn default_join_on_last_line_is_invalid() {
        let mut s = session_with("a\nb\n");
        s.current_line = 2;
        assert_eq!(join_range(&mut s, 0, 0, true), Err(EdError::InvalidAddress));
    }

    #[test]
    fn move_to_front() {
        let mut s = session_with("L1\nL2\nL3\nL4");
        move_lines(&mut s, 2, 3, 0).unwrap();
        assert_eq!(s.buffer.to_text(), "L2\nL3\nL1\nL4");
        assert_eq!(s.current_line, 2);
    }

    #[test]
    fn move_toward_end() {
        let mut s = session_with("a\nb\nc\nd\n");
        move_lines(&mut s, 1, 2, 4).unwrap();
        assert_eq!(s.buffer.to_text(), "c\nd\na\nb\n");
        assert_eq!(s.current_line, 4);
    }

    #[test]
    fn move_rejects_destination_inside_range() {
        let mut s = session_with("a\nb\nc\nd\n");
        assert_eq!(move_lines(&mut s, 2, 4, 3), Err(EdError::InvalidDestination));
        assert_eq!(move_lines(&mut s, 2, 4, 2), Err(EdError::InvalidDestination));
        // dst == end means "after the last moved line": a no-op, not an error.
        move_lines(&mut s, 2, 4, 4).unwrap();
        assert_eq!(s.buffer.to_text(), "a\nb\nc\nd\n");
    }

    #[test]
    fn move_rejects_destination_past_end() {
        let mut s = session_with("a\nb\n");
        assert_eq!(move_lines(&mut s, 1, 1, 5), Err(EdError::InvalidDestination));
    }

    #[test]
    fn insert_reads_until_lone_dot() {
        let mut s = session_with("a\nb\n");
        let mut input = ScriptInput::new(["x", "y", ".", "ignored"]);
        read_and_insert_at(&mut s, &mut input, 1);
        assert_eq!(s.buffer.to_text(), "a\nx\ny\nb\n");
    }

    #[test]
    fn append_at_end_forces_trailing_newline() {
        let mut s = session_with("a\nb");
        let mut input = ScriptInput::new(["c", "."]);
        let end = s.buffer.entry_count();
        read_and_insert_at(&mut s, &mut input, end);
        assert_eq!(s.buffer.to_text(), "a\nb\nc\n");
    }

    #[test]
    fn insert_nothing_is_a_noop() {
        let mut s = session_with("a\n");
        s.current_line = 1;
        let mut input = ScriptInput::new(["."]);
        read_and_insert_at(&mut s, &mut input, 0);
        assert_eq!(s.buffer.to_text(), "a\n");
        assert_eq!(s.current_line, 1);
    }

    #[test]
    fn insert_before_next_line_advances_it() {
        let mut s = session_with("a\nb\nc\n");
        s.next_line = 2;
        let mut input = ScriptInput::new(["x", "."]);
        read_and_insert_at(&mut s, &mut input, 1);
        assert_eq!(s.next_line, 3);
    }

    #[test]
    fn insert_after_next_line_leaves_it_alone() {
        let mut s = session_with("a\nb\nc\n");
        s.next_line = 1;
        let mut input = ScriptInput::new(["x", "."]);
        read_and_insert_at(&mut s, &mut input, 2);
        assert_eq!(s.next_line, 1);
    }
}
