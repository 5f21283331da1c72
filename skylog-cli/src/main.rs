//! Skylog CLI
//!
//! Command-line interface for the pipeline tracking service.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use skylog_client::config::{DEFAULT_API_URL, default_config_dir};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "skylog")]
#[command(about = "Track pipeline runs in the cloud", long_about = None)]
struct Cli {
    /// Tracking service URL
    #[arg(long, env = "SKYLOG_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Directory holding config.yaml (defaults to ~/.skylog/stats)
    #[arg(long, env = "SKYLOG_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skylog_cli=info,skylog_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
        config_dir: cli.config_dir.unwrap_or_else(default_config_dir),
    };

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::{KeyCommands, PipelineCommands};

    #[test]
    fn test_parse_set_key() {
        let cli = Cli::try_parse_from([
            "skylog",
            "--config-dir",
            "/tmp/skylog",
            "key",
            "set",
            "abcdefghijklmnopqrstuv",
        ])
        .unwrap();

        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/skylog")));
        assert!(matches!(
            cli.command,
            Commands::Key {
                command: KeyCommands::Set { ref key }
            } if key == "abcdefghijklmnopqrstuv"
        ));
    }

    #[test]
    fn test_parse_write_pipeline() {
        let cli = Cli::try_parse_from([
            "skylog", "pipeline", "write", "abc", "error", "--log", "boom",
        ])
        .unwrap();

        match cli.command {
            Commands::Pipeline {
                command:
                    PipelineCommands::Write {
                        pipeline_id,
                        status,
                        log,
                        name,
                        dag,
                    },
            } => {
                assert_eq!(pipeline_id, "abc");
                assert_eq!(status, "error");
                assert_eq!(log.as_deref(), Some("boom"));
                assert!(name.is_none());
                assert!(dag.is_none());
            }
            _ => panic!("expected pipeline write"),
        }
    }

    #[test]
    fn test_parse_run_keeps_child_arguments() {
        let cli = Cli::try_parse_from([
            "skylog", "run", "--name", "etl", "--", "make", "-j4", "all",
        ])
        .unwrap();

        match cli.command {
            Commands::Run { name, program } => {
                assert_eq!(name.as_deref(), Some("etl"));
                assert_eq!(program, vec!["make", "-j4", "all"]);
            }
            _ => panic!("expected run"),
        }
    }
}
