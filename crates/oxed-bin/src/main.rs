//! Oxed entrypoint: argument parsing, logging, and the read loop.
use anyhow::Result;
use clap::Parser;
use core_actions::{Flow, LineInput, StdoutConsole, io_ops, run_line};
use core_state::Session;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "oxed", version, about = "Line-oriented text editor")]
struct Args {
    /// Optional path to open at startup. If omitted the session starts with
    /// an empty buffer and no filename.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `oxed.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

/// Terminal input: one line per call, trailing newline stripped, `None` at
/// end of input.
struct StdinInput {
    reader: std::io::StdinLock<'static>,
}

impl StdinInput {
    fn new() -> Self {
        Self {
            reader: std::io::stdin().lock(),
        }
    }
}

impl LineInput for StdinInput {
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Some(line)
            }
        }
    }
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("oxed.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "oxed.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global tracing subscriber already installed; drop guard so the
        // writer shuts down.
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<ExitCode> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config = core_config::load_from(args.config.clone())?;

    let mut session = Session::new();
    session.print_errors = config.verbose_errors();

    let mut console = StdoutConsole;
    if let Some(path) = args.path {
        session.filename = Some(path);
        if let Err(e) = io_ops::load_file(&mut session, &mut console, None, "") {
            eprintln!("{e}");
            error!(target: "runtime", error = %e, "startup_load_failed");
            return Ok(ExitCode::FAILURE);
        }
    }
    let file = session.filename.as_ref().map(|p| p.display().to_string());
    info!(
        target: "runtime.startup",
        file = file.as_deref(),
        lines = session.last_line(),
        config_override = args.config.is_some(),
        "bootstrap_complete"
    );

    let mut input = StdinInput::new();
    loop {
        if let Some(prompt) = config.prompt() {
            print!("{prompt}");
            std::io::stdout().flush()?;
        }
        let Some(line) = input.read_line() else {
            break;
        };
        match run_line(&mut session, &mut input, &mut console, &line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => {
                eprintln!("{e}");
                error!(target: "runtime", error = %e, "fatal_error");
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    info!(target: "runtime", "shutdown");
    Ok(ExitCode::SUCCESS)
}
