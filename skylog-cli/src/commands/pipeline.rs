//! Pipeline command handlers
//!
//! Handles fetching pipeline history, writing statuses and deleting
//! pipeline records.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use serde_json::Value as JsonValue;
use skylog_client::{CloudClient, PipelineRun, PipelineUpdate};
use skylog_core::domain::pipeline::PipelineStatus;

use crate::config::Config;

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// Show pipeline history
    Get {
        /// Only show this pipeline
        pipeline_id: Option<String>,

        /// Ask the service for full records
        #[arg(short, long)]
        verbose: bool,

        /// Print raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Write a pipeline status
    Write {
        /// Pipeline ID
        pipeline_id: String,

        /// One of started, finished, error
        status: String,

        /// Free-form log, typically an error message
        #[arg(short, long)]
        log: Option<String>,

        /// Pipeline name
        #[arg(short, long)]
        name: Option<String>,

        /// DAG snapshot as a JSON document
        #[arg(short, long, value_parser = parse_json)]
        dag: Option<JsonValue>,
    },
    /// Delete a pipeline record
    Delete {
        /// Pipeline ID
        pipeline_id: String,
    },
}

/// Parse a DAG argument as JSON
fn parse_json(s: &str) -> Result<JsonValue> {
    serde_json::from_str(s).with_context(|| format!("invalid JSON for --dag: `{}`", s))
}

/// Handle pipeline commands
///
/// Routes pipeline subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The pipeline command to execute
/// * `config` - The CLI configuration
pub async fn handle_pipeline_command(command: PipelineCommands, config: &Config) -> Result<()> {
    let client = CloudClient::new(&config.client_config())?;

    match command {
        PipelineCommands::Get {
            pipeline_id,
            verbose,
            json,
        } => get_pipelines(&client, pipeline_id.as_deref(), verbose, json).await,
        PipelineCommands::Write {
            pipeline_id,
            status,
            log,
            name,
            dag,
        } => {
            let update = PipelineUpdate {
                pipeline_id,
                status,
                log,
                pipeline_name: name,
                dag,
            };
            write_pipeline(&client, update).await
        }
        PipelineCommands::Delete { pipeline_id } => delete_pipeline(&client, &pipeline_id).await,
    }
}

/// Fetch and display pipeline history
async fn get_pipelines(
    client: &CloudClient,
    pipeline_id: Option<&str>,
    verbose: bool,
    json: bool,
) -> Result<()> {
    let runs = client
        .get_pipeline(pipeline_id, verbose)
        .await
        .context("Issue fetching pipeline")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&runs)?);
        return Ok(());
    }

    if runs.is_empty() {
        println!("{}", "No pipelines found.".yellow());
    } else {
        println!("{}", format!("Found {} pipeline(s):", runs.len()).bold());
        println!();
        for run in &runs {
            print_run_summary(run, verbose);
        }
    }

    Ok(())
}

/// Write a pipeline status
async fn write_pipeline(client: &CloudClient, update: PipelineUpdate) -> Result<()> {
    let pipeline_id = update.pipeline_id.clone();
    let response = client
        .write_pipeline(update)
        .await
        .context("Error writing pipeline")?;

    println!(
        "{}",
        format!("✓ Pipeline {} updated", pipeline_id).green().bold()
    );
    if !response.is_empty() {
        println!("  Response: {}", response.dimmed());
    }

    Ok(())
}

/// Delete a pipeline record
async fn delete_pipeline(client: &CloudClient, pipeline_id: &str) -> Result<()> {
    let response = client
        .delete_pipeline(pipeline_id)
        .await
        .context("Issue deleting pipeline")?;

    println!(
        "{}",
        format!("✓ Pipeline {} deleted", pipeline_id).green().bold()
    );
    if !response.is_empty() {
        println!("  Response: {}", response.dimmed());
    }

    Ok(())
}

/// Print a pipeline run summary
fn print_run_summary(run: &PipelineRun, verbose: bool) {
    let id = run.pipeline_id_text();
    let title = run
        .pipeline_name_text()
        .or_else(|| id.clone())
        .unwrap_or_else(|| "<unnamed>".to_string());

    println!("  {} {}", "▸".cyan(), title.bold());
    if let Some(id) = &id {
        println!("    ID:       {}", id.dimmed());
    }
    println!("    Status:   {}", colorize_status(run));
    println!("    Last run: {}", run.updated);

    if verbose {
        if let Some(log) = run.log_text() {
            println!("    Log:      {}", log.dimmed());
        }
        if let Some(dag) = &run.dag {
            println!("    DAG:      {}", dag.to_string().dimmed());
        }
    }
    println!();
}

fn colorize_status(run: &PipelineRun) -> ColoredString {
    let Some(raw) = run.status_text() else {
        return "unknown".dimmed();
    };

    match run.parsed_status() {
        Some(PipelineStatus::Started) => raw.yellow(),
        Some(PipelineStatus::Finished) => raw.green(),
        Some(PipelineStatus::Error) => raw.red(),
        None => raw.normal(),
    }
}
