//! CLI module for Trellis.
//!
//! The CLI runs the layout model against an in-memory host: scripts of host
//! events are replayed and the resulting tree is printed.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;
pub use commands::replay::{ReplayReport, load_script, replay};

use crate::error::TrellisError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), TrellisError> {
    let cli = Cli::parse();
    cli.execute()
}
