//! Input/output seams for the command engine.
//!
//! The engine never touches stdin/stdout directly: commands that read more
//! lines (`a`, `i`, `c`, global continuations) pull from a [`LineInput`], and
//! everything user-visible goes through a [`Console`]. The binary wires these
//! to the real terminal; tests use the scripted/recording implementations so
//! whole command sessions run hermetically.

use std::collections::VecDeque;

/// Source of additional input lines. `None` means end of input.
pub trait LineInput {
    fn read_line(&mut self) -> Option<String>;
}

/// Sink for user-visible output, one line per call (no trailing newline in
/// `text`).
pub trait Console {
    fn print(&mut self, text: &str);
}

/// Pre-scripted input lines, consumed front to back.
#[derive(Debug, Default)]
pub struct ScriptInput {
    lines: VecDeque<String>,
}

impl ScriptInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl LineInput for ScriptInput {
    fn read_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}

/// Console writing straight to stdout.
#[derive(Debug, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn print(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Console capturing every printed line, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    pub lines: Vec<String>,
}

impl Console for RecordingConsole {
    fn print(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}
