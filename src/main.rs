//! Command-line entry point for canopy.
//!
//! Parses arguments, initializes logging, and dispatches to the subcommand
//! handlers in [`cli`].

#![warn(clippy::all, rust_2018_idioms)]
#![allow(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use clap::Parser as _;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    canopy::logging::init()?;

    let cli = cli::Cli::parse();
    cli::run_command(cli.command)?;

    Ok(())
}
