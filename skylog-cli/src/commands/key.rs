//! Key command handlers
//!
//! Stores and shows the API key kept in the user config file.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use skylog_client::CloudClient;

use crate::config::Config;

/// Key subcommands
#[derive(Subcommand)]
pub enum KeyCommands {
    /// Validate and store an API key
    Set {
        /// The 22 character API key
        key: String,
    },
    /// Show the stored API key
    Show,
}

/// Handle key commands
pub fn handle_key_command(command: KeyCommands, config: &Config) -> Result<()> {
    let client = CloudClient::new(&config.client_config())?;

    match command {
        KeyCommands::Set { key } => set_key(&client, &key),
        KeyCommands::Show => show_key(&client),
    }
}

fn set_key(client: &CloudClient, key: &str) -> Result<()> {
    let key = client
        .set_key(key)
        .context("Please validate your key or contact the admin")?;

    println!("{}", "✓ Key was stored".green().bold());
    println!("  Key: {}", key.as_str().cyan());

    Ok(())
}

fn show_key(client: &CloudClient) -> Result<()> {
    match client.get_key()? {
        Some(key) => println!("{}", key),
        None => println!(
            "{}",
            "No cloud API Key was found. Store one with `skylog key set <KEY>`.".yellow()
        ),
    }

    Ok(())
}
