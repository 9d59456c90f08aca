//! `tac23` binary entry point.
//!
//! Flow: parse CLI flags → read the XML source → load a [`Program`] →
//! open the I/O streams → run the dispatch loop → report the exit
//! status. Any failure prints its message and sets a nonzero exit
//! status; nothing else calls `std::process::exit` directly.

use std::process::ExitCode;

use tac23::cli::Config;
use tac23::error::ExitCode as EngineExitCode;
use tac23::program::Program;
use tac23::stats::Stats;
use tac23::{frame, loader, vm};

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::parse(&argv) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(e.exit_code().code() as u8);
        }
    };

    if config.help {
        Config::print_usage();
        return ExitCode::SUCCESS;
    }

    match run(&config) {
        Ok(status) => ExitCode::from(status as u8),
        Err(status) => ExitCode::from(status as u8),
    }
}

/// Run the engine end to end, returning the process status either way
/// (a clean `EXIT`/fall-off-the-end status on `Ok`, or the mapped
/// [`EngineExitCode`] on `Err`).
fn run(config: &Config) -> Result<i32, i32> {
    let source = config.read_source().map_err(|e| {
        eprintln!("{}", e);
        e.exit_code().code()
    })?;

    let program: Program = loader::load(&source).map_err(|e| {
        eprintln!("{}", e);
        e.exit_code().code()
    })?;

    let mut frames = frame::Frames::new();
    let mut stats = Stats::new();
    let mut io = config.open_io().map_err(|e| {
        eprintln!("{}", e);
        e.exit_code().code()
    })?;

    let result = vm::run(&program, &mut frames, &mut io, &mut stats);
    let _ = io.flush();

    if let Some(stats_path) = &config.stats_path {
        if let Err(e) = std::fs::write(stats_path, stats.render(&config.stat_flags)) {
            eprintln!("failed to write stats to '{}': {}", stats_path, e);
            return Err(EngineExitCode::InputUnavailable.code());
        }
    }

    match result {
        Ok(status) => Ok(status as i32),
        Err(e) => {
            eprintln!("{}", e);
            Err(e.exit_code().code())
        }
    }
}
