use core_actions::{Flow, LineInput, RecordingConsole, ScriptInput, run_line};
use core_buffer::LineBuffer;
use core_state::Session;

pub fn session_with(text: &str) -> Session {
    let mut session = Session::new();
    session.replace_with_loaded(LineBuffer::from_text(text));
    session
}

/// Feed every line of `script` through the engine as if typed at the prompt.
/// Commands that read further input (`a`, `i`, `c`, global continuations)
/// consume the following script lines themselves. Returns everything printed
/// and whether the session quit before the script ran out.
pub fn run_script(session: &mut Session, script: &[&str]) -> (Vec<String>, bool) {
    let mut input = ScriptInput::new(script.iter().copied());
    let mut console = RecordingConsole::default();
    let mut quit = false;
    while let Some(line) = input.read_line() {
        match run_line(session, &mut input, &mut console, &line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => {
                quit = true;
                break;
            }
            Err(e) => panic!("unexpected fatal error: {e}"),
        }
    }
    (console.lines, quit)
}
