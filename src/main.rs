use std::{fs, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tslite::{
    check, compile,
    options::{DEFAULT_MAX_CALL_DEPTH, Mode, Options},
    run_source,
};

/// tslite runs programs written in a small, TypeScript-like language after
/// checking their types.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells tslite to look at a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// Runs the program without type checking it first.
    #[arg(long, conflicts_with = "check_only")]
    unchecked: bool,

    /// Only type checks the program; nothing is executed.
    #[arg(long)]
    check_only: bool,

    /// Calls nested deeper than this stop the program.
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,

    /// Logs what the interpreter is doing to stderr. Repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    contents: String,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("tslite=debug"),
        _ => EnvFilter::new("tslite=trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(std::io::stderr)
                             .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let script = if args.file {
        match fs::read_to_string(&args.contents) {
            Ok(script) => script,
            Err(_) => {
                eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                          &args.contents);
                return ExitCode::FAILURE;
            },
        }
    } else {
        args.contents
    };

    if args.check_only {
        return check_only(&script);
    }

    let mode = if args.unchecked { Mode::Unchecked } else { Mode::Checked };
    let options = Options::default().with_mode(mode)
                                    .with_max_call_depth(args.max_depth)
                                    .with_echo_output(true);

    match run_source(&script, &options).error {
        Some(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
        None => ExitCode::SUCCESS,
    }
}

fn check_only(script: &str) -> ExitCode {
    let program = match compile(script) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        },
    };

    let diagnostics = check(&program);
    for diagnostic in &diagnostics {
        eprintln!("{diagnostic}");
    }
    if diagnostics.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
