//! Console Command Replay
//!
//! Runs a recorded list of decoded ANSI commands through the translator
//! against an in-memory console and prints the result. Useful for checking
//! what a command stream does to a console without a Windows host.
//!
//! # Usage
//!
//! ```bash
//! # Commands are a JSON array, one object per command
//! echo '[{"op":"set_foreground","color":1},{"op":"erase_line","mode":"all"}]' \
//!     | conhost-replay --calls
//!
//! # Plain text rows of the window after replay
//! conhost-replay --input session.json --text
//! ```

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use mochi_conhost::console::MemoryConsole;
use mochi_conhost::core::Coord;
use mochi_conhost::{AnsiTranslator, Command, Config};
use tracing_subscriber::EnvFilter;

/// Command-line arguments
struct Args {
    /// Input file (stdin if not specified)
    input: Option<PathBuf>,
    /// Translator config file
    config: Option<PathBuf>,
    /// Print the window as plain text instead of JSON
    text: bool,
    /// Print the console call log
    calls: bool,
    /// Buffer columns
    cols: i16,
    /// Buffer rows
    rows: i16,
    /// Visible window rows
    window: i16,
    /// Show help
    help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            input: None,
            config: None,
            text: false,
            calls: false,
            cols: 80,
            rows: 300,
            window: 25,
            help: false,
        }
    }
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-h" | "--help" => {
                args.help = true;
            },
            "-i" | "--input" => {
                i += 1;
                if let Some(value) = argv.get(i) {
                    args.input = Some(PathBuf::from(value));
                }
            },
            "--config" => {
                i += 1;
                if let Some(value) = argv.get(i) {
                    args.config = Some(PathBuf::from(value));
                }
            },
            "-t" | "--text" => {
                args.text = true;
            },
            "-l" | "--calls" => {
                args.calls = true;
            },
            "-c" | "--cols" => {
                i += 1;
                args.cols = argv.get(i).and_then(|v| v.parse().ok()).unwrap_or(80);
            },
            "-r" | "--rows" => {
                i += 1;
                args.rows = argv.get(i).and_then(|v| v.parse().ok()).unwrap_or(300);
            },
            "-w" | "--window" => {
                i += 1;
                args.window = argv.get(i).and_then(|v| v.parse().ok()).unwrap_or(25);
            },
            other => {
                tracing::warn!(argument = other, "ignoring unknown argument");
            },
        }
        i += 1;
    }

    args
}

fn print_help() {
    eprintln!(
        r#"conhost-replay - Replay decoded ANSI commands on an in-memory console

USAGE:
    conhost-replay [OPTIONS]

OPTIONS:
    -h, --help              Show this help message
    -i, --input <FILE>      JSON command list (stdin if not specified)
        --config <FILE>     Translator config (JSON, default: ~/.config/mochi/conhost.json)
    -t, --text              Print window rows as plain text instead of JSON
    -l, --calls             Also print every console call, one JSON object per line
    -c, --cols <N>          Buffer columns (default: 80)
    -r, --rows <N>          Buffer rows (default: 300)
    -w, --window <N>        Visible window rows (default: 25)

Set RUST_LOG=trace to log every command and console call."#
    );
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = parse_args();
    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("replay failed: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let input = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut data = String::new();
            io::stdin().read_to_string(&mut data)?;
            data
        },
    };
    let commands: Vec<Command> = serde_json::from_str(&input)?;

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(),
    };

    let console = MemoryConsole::new(args.cols, args.rows)
        .with_window(0, args.window)
        .with_cursor(Coord::new(0, 0));
    let mut translator = AnsiTranslator::with_config(console, &config)?;
    translator.console_mut().clear_calls();

    for (index, command) in commands.into_iter().enumerate() {
        if let Err(e) = translator.apply(command) {
            tracing::error!(index, ?command, "command failed");
            return Err(e.into());
        }
    }

    let mut out = io::stdout().lock();
    if args.calls {
        for call in translator.console().calls() {
            writeln!(out, "{}", serde_json::to_string(call)?)?;
        }
    }

    let dump = translator.console().dump();
    if args.text {
        for row in &dump.rows {
            writeln!(out, "{}", row)?;
        }
    } else {
        writeln!(out, "{}", serde_json::to_string_pretty(&dump)?)?;
    }

    translator.close()?;
    Ok(())
}
