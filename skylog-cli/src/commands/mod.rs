//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod key;
mod pipeline;
mod run;

pub use key::KeyCommands;
pub use pipeline::PipelineCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// API key management
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },
    /// Pipeline status and history
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommands,
    },
    /// Run a program and report its lifecycle
    Run {
        /// Pipeline name sent with every report
        #[arg(short, long)]
        name: Option<String>,

        /// Program and arguments, after `--`
        #[arg(last = true, required = true)]
        program: Vec<String>,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Key { command } => key::handle_key_command(command, config),
        Commands::Pipeline { command } => {
            pipeline::handle_pipeline_command(command, config).await
        }
        Commands::Run { name, program } => run::run_tracked(config, name, program).await,
    }
}
