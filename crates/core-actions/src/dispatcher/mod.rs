//! Command dispatch: one raw input line in, one buffer/session effect out.
//!
//! A command is an optional address prefix followed by a single command
//! character. Dispatch runs in two tiers, mirroring the command grammar:
//! first the commands that consume the rest of the line themselves (`m`, `w`,
//! `e`, `s`), then the strict ones where any trailing character is a suffix
//! error (`q`, the empty command, `=`, `n`, `p`, `h`, `H`, `a`, `i`, `d`,
//! `c`, `j`, `u`).
//!
//! [`run_line`] is the single command boundary: it routes `g`/`v` lines to
//! the global executor, and catches every non-fatal error — printing `?`,
//! recording it as the session's last error, and letting the session
//! continue. Only the fatal unreadable-file error escapes to the caller.

use crate::input::{Console, LineInput};
use crate::{address, global, io_ops, subst};
use core_state::{EdError, Session};
use tracing::{trace, warn};

pub(crate) mod edit;

/// What the read loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run one raw input line. This is the only entry point the read loop needs;
/// it classifies global commands (reading continuation lines from `input`),
/// dispatches everything else directly, and applies the error boundary.
pub fn run_line(
    session: &mut Session,
    input: &mut dyn LineInput,
    console: &mut dyn Console,
    line: &str,
) -> Result<Flow, EdError> {
    let result = if global::is_global_command(line) {
        let full = global::read_full_command(line.to_string(), input);
        global::parse_and_run(session, input, console, &full)
    } else {
        execute(session, input, console, line)
    };
    match result {
        Ok(flow) => Ok(flow),
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            console.print("?");
            if session.print_errors {
                console.print(&err.to_string());
            }
            warn!(target: "command.dispatch", error = %err, "command_failed");
            session.record_error(err);
            Ok(Flow::Continue)
        }
    }
}

/// Dispatch one command string and then remember it as the last command
/// (whether it succeeded or not) for the quit/load confirm-by-repeat guard.
/// Global sub-commands come through here too, so the guard sees them.
pub(crate) fn execute(
    session: &mut Session,
    input: &mut dyn LineInput,
    console: &mut dyn Console,
    command: &str,
) -> Result<Flow, EdError> {
    trace!(target: "command.dispatch", command, "execute");
    let result = dispatch(session, input, console, command);
    session.last_command = command.to_string();
    result
}

fn dispatch(
    session: &mut Session,
    input: &mut dyn LineInput,
    console: &mut dyn Console,
    command: &str,
) -> Result<Flow, EdError> {
    let spec = address::parse_range(session, command);
    let rest = &command[spec.consumed..];
    let is_default_range = spec.consumed == 0;

    let mut chars = rest.chars();
    let head = chars.next();
    let tail = chars.as_str();

    // Tier 1: commands that own the rest of the line.
    match head {
        Some('m') => {
            session.save_state();
            let (value, scanned) = address::scan_line_number(tail);
            let dst = if scanned == 0 {
                session.current_line
            } else {
                value
            };
            edit::move_lines(session, spec.start, spec.end, dst)?;
            return Ok(Flow::Continue);
        }
        Some('w') => {
            let (new_name, quit_after) = match tail {
                "" => (None, false),
                "q" => (None, true),
                t if t.starts_with(' ') => (Some(&t[1..]), false),
                _ => return Err(EdError::BadCommandSuffix),
            };
            io_ops::save_file(session, console, new_name)?;
            return if quit_after {
                Ok(Flow::Quit)
            } else {
                Ok(Flow::Continue)
            };
        }
        Some('e') => {
            let new_name = match tail {
                "" => None,
                t if t.starts_with(' ') => Some(&t[1..]),
                _ => return Err(EdError::BadCommandSuffix),
            };
            io_ops::load_file(session, console, new_name, command)?;
            return Ok(Flow::Continue);
        }
        Some('s') => {
            let params = subst::parse_params(tail)?;
            session.save_state();
            edit::check_range(session, spec.start, spec.end)?;
            subst::substitute_on_lines(session, &params, spec.start, spec.end)?;
            return Ok(Flow::Continue);
        }
        Some('g') | Some('v') if session.running_global => {
            return Err(EdError::NestedGlobal);
        }
        _ => {}
    }

    // Tier 2: exactly one character may remain.
    if rest.chars().count() > 1 {
        return Err(EdError::BadCommandSuffix);
    }

    match head {
        // Bare address (or bare return): advance by one line outside a
        // global, then print the current line.
        None => {
            if is_default_range && !session.running_global {
                let next = session.current_line + 1;
                if next > session.last_line() {
                    return Err(EdError::InvalidAddress);
                }
                session.current_line = next;
            }
            edit::print_range(
                session,
                console,
                session.current_line,
                session.current_line,
                false,
            )?;
            Ok(Flow::Continue)
        }
        Some('q') => {
            if !is_default_range {
                return Err(EdError::UnexpectedAddress);
            }
            if session.modified && session.last_command != command {
                return Err(EdError::ModifiedBuffer);
            }
            Ok(Flow::Quit)
        }
        Some('=') => {
            let line_num = if is_default_range {
                session.last_line()
            } else {
                spec.end
            };
            console.print(&line_num.to_string());
            Ok(Flow::Continue)
        }
        Some('p') => {
            edit::print_range(session, console, spec.start, spec.end, false)?;
            Ok(Flow::Continue)
        }
        Some('n') => {
            edit::print_range(session, console, spec.start, spec.end, true)?;
            Ok(Flow::Continue)
        }
        Some('h') => {
            if let Some(err) = &session.last_error {
                console.print(&err.to_string());
            }
            Ok(Flow::Continue)
        }
        Some('H') => {
            session.print_errors = !session.print_errors;
            Ok(Flow::Continue)
        }
        Some('a') => {
            session.save_state();
            edit::read_and_insert_at(session, input, session.current_line);
            Ok(Flow::Continue)
        }
        Some('i') => {
            session.save_state();
            edit::read_and_insert_at(session, input, session.current_line.saturating_sub(1));
            Ok(Flow::Continue)
        }
        Some('d') => {
            session.save_state();
            edit::delete_range(session, spec.start, spec.end)?;
            Ok(Flow::Continue)
        }
        Some('c') => {
            session.save_state();
            let was_ending_range = spec.end == session.last_line();
            edit::delete_range(session, spec.start, spec.end)?;
            let index = if was_ending_range {
                session.last_line()
            } else {
                session.current_line.saturating_sub(1)
            };
            edit::read_and_insert_at(session, input, index);
            Ok(Flow::Continue)
        }
        Some('j') => {
            session.save_state();
            edit::join_range(session, spec.start, spec.end, is_default_range)?;
            Ok(Flow::Continue)
        }
        Some('u') => {
            session.undo_swap()?;
            Ok(Flow::Continue)
        }
        Some(_) => Err(EdError::UnknownCommand),
    }
}
