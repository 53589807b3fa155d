//! Termcel - command-line tool for playing and editing terminal ASCII animations

use std::process::ExitCode;

use termcel::cli;

fn main() -> ExitCode {
    cli::run()
}
