//! Command engine for the line editor: address parsing, dispatch, line
//! mutation, substitution, global commands, and file I/O.
//!
//! The binary feeds raw input lines to [`run_line`] one at a time and reacts
//! to the returned [`Flow`]. Everything else — how a command reads extra
//! input, what it prints, how errors surface — happens behind the
//! [`input::LineInput`] and [`input::Console`] seams, which is also what
//! makes whole editing sessions scriptable in tests.

pub mod address;
pub mod dispatcher;
mod global;
pub mod input;
pub mod io_ops;
pub mod subst;

pub use dispatcher::{Flow, run_line};
pub use input::{Console, LineInput, RecordingConsole, ScriptInput, StdoutConsole};
