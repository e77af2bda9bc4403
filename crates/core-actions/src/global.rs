//! The `g`/`v` global command executor.
//!
//! Execution is two-phase. Phase 1 compiles the pattern and scans the range
//! once, recording the id of every matching (for `v`, non-matching) line in a
//! hash set keyed by stable [`LineId`]s — never by position or address, since
//! the sub-commands are free to delete, replace, or move any line. Phase 2
//! walks the buffer through the session's `next_line` cursor, running every
//! sub-command on each marked line; the editing operations keep `next_line`
//! consistent, so lines deleted mid-run are skipped and lines inserted at or
//! after the cursor are revisited exactly once if marked (fresh lines never
//! are, their ids are new).
//!
//! A command body can span input lines: a trailing `\` continues the command,
//! and the joined string splits on `\n` into one sub-command per segment.
//! The first sub-command error aborts the whole global run.

use crate::address;
use crate::dispatcher::{self, Flow};
use crate::input::{Console, LineInput};
use crate::subst::find_unescaped_slash;
use core_buffer::LineId;
use core_state::{EdError, Session};
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// True when `command` is the first line of a global command (an optional
/// address prefix followed by `g` or `v`). Pure classification; the session
/// is not consulted or touched.
pub(crate) fn is_global_command(command: &str) -> bool {
    let rest = &command[address_len(command)..];
    rest.starts_with('g') || rest.starts_with('v')
}

fn address_len(command: &str) -> usize {
    address::address_prefix_len(command)
}

/// Collect the full (possibly multi-line) command body: while the last line
/// ends in `\`, pull another input line and join with a newline.
pub(crate) fn read_full_command(mut command: String, input: &mut dyn LineInput) -> String {
    while command.ends_with('\\') {
        match input.read_line() {
            Some(next) => {
                command.push('\n');
                command.push_str(&next);
            }
            None => break,
        }
    }
    command
}

/// Parse a complete global command string (as assembled by
/// [`read_full_command`]) and run it.
pub(crate) fn parse_and_run(
    session: &mut Session,
    input: &mut dyn LineInput,
    console: &mut dyn Console,
    command: &str,
) -> Result<Flow, EdError> {
    let spec = address::parse_range(session, command);
    let is_default_range = spec.consumed == 0;
    let (start, end) = if is_default_range {
        (1, session.last_line())
    } else {
        (spec.start, spec.end)
    };

    let rest = &command[spec.consumed..];
    let mut chars = rest.chars();
    let kind = chars.next();
    debug_assert!(matches!(kind, Some('g') | Some('v')));
    let is_inverted = kind == Some('v');

    let body = chars
        .as_str()
        .strip_prefix('/')
        .ok_or(EdError::RegexMissingOpen)?;
    let pattern_end = find_unescaped_slash(body).ok_or(EdError::RegexUnterminated)?;
    let pattern = &body[..pattern_end];

    // One sub-command per segment; every segment but the last still carries
    // the continuation backslash that spliced it to the next line.
    let mut sub_commands: Vec<String> = body[pattern_end + 1..]
        .split('\n')
        .map(str::to_string)
        .collect();
    let last = sub_commands.len() - 1;
    for cmd in &mut sub_commands[..last] {
        if let Some(stripped) = cmd.strip_suffix('\\') {
            cmd.truncate(stripped.len());
        }
    }

    run_global(
        session,
        input,
        console,
        start,
        end,
        pattern,
        &sub_commands,
        is_inverted,
        is_default_range,
    )
}

#[allow(clippy::too_many_arguments)]
fn run_global(
    session: &mut Session,
    input: &mut dyn LineInput,
    console: &mut dyn Console,
    start: usize,
    end: usize,
    pattern: &str,
    sub_commands: &[String],
    is_inverted: bool,
    is_default_range: bool,
) -> Result<Flow, EdError> {
    if session.running_global {
        return Err(EdError::NestedGlobal);
    }
    let re = Regex::new(pattern).map_err(|e| EdError::RegexCompile(e.to_string()))?;
    if !is_default_range {
        crate::dispatcher::edit::check_range(session, start, end)?;
    }
    debug!(
        target: "global",
        start,
        end,
        pattern,
        inverted = is_inverted,
        sub_commands = sub_commands.len(),
        "phase1_scan"
    );

    // Phase 1: mark matching lines by id. The default range on an empty
    // buffer is (1, 0); the scan is simply empty.
    let mut marked: HashSet<LineId> = HashSet::new();
    for line_num in start..=end {
        let Some(text) = session.buffer.text(line_num - 1) else {
            break;
        };
        if re.is_match(text) != is_inverted
            && let Some(id) = session.buffer.id(line_num - 1)
        {
            marked.insert(id);
        }
    }

    // Phase 2 runs with the flag set so editing operations maintain
    // `next_line` and the empty command stops auto-advancing; clear it again
    // no matter how the run ends.
    session.running_global = true;
    let result = run_marked(session, input, console, &marked, sub_commands);
    session.running_global = false;
    result
}

fn run_marked(
    session: &mut Session,
    input: &mut dyn LineInput,
    console: &mut dyn Console,
    marked: &HashSet<LineId>,
    sub_commands: &[String],
) -> Result<Flow, EdError> {
    session.next_line = 1;
    while session.next_line <= session.last_line() {
        let index = session.next_line - 1;
        let is_marked = session
            .buffer
            .id(index)
            .is_some_and(|id| marked.contains(&id));
        if !is_marked {
            session.next_line += 1;
            continue;
        }
        session.current_line = session.next_line;
        session.next_line += 1;
        for cmd in sub_commands {
            if let Flow::Quit = dispatcher::execute(session, input, console, cmd)? {
                return Ok(Flow::Quit);
            }
        }
    }
    Ok(Flow::Continue)
}
