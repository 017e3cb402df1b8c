//! Trolley CLI

use std::{io, process::ExitCode};

use clap::Parser;

use crate::cli::{Cli, CliError};

mod cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.run(io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report(&error);
            ExitCode::FAILURE
        }
    }
}

#[expect(clippy::print_stderr, reason = "CLI error reporting")]
fn report(error: &CliError) {
    eprintln!("error: {error}");
}
