//! CLI command definitions using Clap.
//!
//! - `actions` - List bindable actions and their triggers
//! - `config_cmd` - Configuration file management
//! - `replay` - Replay a host event script against the layout model
//! - `types` - Shared types used across commands

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::TrellisError;
use crate::{config, schema};

pub mod actions;
pub mod config_cmd;
pub mod replay;
pub mod types;

pub use actions::ActionsArgs;
pub use config_cmd::ConfigCommands;
pub use replay::ReplayArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Trellis CLI - drive and inspect the tiling layout model.
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Replay a host event script and print the resulting layout.
    ///
    /// The script is a JSONC array of events such as `view-attached`,
    /// `pointer-motion` or `binding`. Run `trellis schema --events` for the
    /// full event format.
    #[command(after_long_help = r#"Examples:
  trellis replay session.jsonc               # Print the layout as a tree
  trellis replay session.jsonc --format table
  trellis replay session.jsonc --format json --all"#)]
    Replay(ReplayArgs),

    /// List bindable actions and their triggers.
    Actions(ActionsArgs),

    /// Configuration file management commands.
    ///
    /// Initialize, locate, and view the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output Trellis JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the configuration file,
    /// or the replay script format with `--events`.
    Schema {
        /// Print the schema for replay scripts instead.
        #[arg(long)]
        events: bool,
    },

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(trellis completions --shell zsh)"
    ///   trellis completions --shell bash > ~/.local/share/bash-completion/completions/trellis
    ///   trellis completions --shell fish > ~/.config/fish/completions/trellis.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), TrellisError> {
        if let Some(path) = &self.config {
            if !path.exists() {
                return Err(TrellisError::InvalidArguments(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            config::set_custom_config_path(path.clone());
        }

        match &self.command {
            Commands::Replay(args) => replay::execute(args),
            Commands::Actions(args) => actions::execute(args),
            Commands::Config(cmd) => config_cmd::execute(cmd),

            Commands::Schema { events } => {
                let schema_output =
                    if *events { schema::print_events_schema() } else { schema::print_schema() };
                println!("{schema_output}");
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "trellis", &mut io::stdout());
    }
}
