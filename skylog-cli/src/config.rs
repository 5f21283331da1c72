//! Configuration module
//!
//! Handles CLI configuration: tracking service URL and config directory.

use skylog_client::ClientConfig;
use skylog_client::config::DEFAULT_TIMEOUT;
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the tracking service
    pub api_url: String,
    /// Directory holding the user config file
    pub config_dir: PathBuf,
}

impl Config {
    /// Client settings for this invocation
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            config_dir: self.config_dir.clone(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
