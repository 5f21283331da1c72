//! Run command handler
//!
//! Runs a program as a child process under the lifecycle tracker, so the
//! tracking service sees it start and then finish or fail.

use anyhow::{Context, Result, anyhow};
use colored::*;
use serde::Serialize;
use skylog_client::{CloudClient, LifecycleTracker};
use tokio::process::Command;

use crate::config::Config;

/// What a finished run reports as its DAG snapshot
#[derive(Debug, Serialize)]
struct ProcessReport {
    program: String,
    args: Vec<String>,
    exit_code: i32,
}

/// Run `program` and report its lifecycle
///
/// A non-zero exit status is reported as an `error` run and returned as an
/// error, so the CLI itself exits unsuccessfully.
pub async fn run_tracked(config: &Config, name: Option<String>, program: Vec<String>) -> Result<()> {
    let client = CloudClient::new(&config.client_config())?;

    let mut tracker = LifecycleTracker::new(client);
    if let Some(name) = name {
        tracker = tracker.with_name(name);
    }

    let report = tracker.track(|| run_process(program)).await?;

    println!(
        "{}",
        format!("✓ {} finished (exit code {})", report.program, report.exit_code)
            .green()
            .bold()
    );

    Ok(())
}

async fn run_process(mut command_line: Vec<String>) -> Result<ProcessReport> {
    if command_line.is_empty() {
        return Err(anyhow!("no program given"));
    }
    let program = command_line.remove(0);
    let args = command_line;

    tracing::info!("Running {} {}", program, args.join(" "));

    let status = Command::new(&program)
        .args(&args)
        .status()
        .await
        .with_context(|| format!("Failed to start {}", program))?;

    match status.code() {
        Some(0) => Ok(ProcessReport {
            program,
            args,
            exit_code: 0,
        }),
        Some(code) => Err(anyhow!("{} exited with status {}", program, code)),
        None => Err(anyhow!("{} was terminated by a signal", program)),
    }
}
