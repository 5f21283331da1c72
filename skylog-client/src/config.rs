//! Client configuration
//!
//! Where the tracking service lives, where the user config file is kept,
//! and how long a single request may take.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Default tracking service host
pub const DEFAULT_API_URL: &str = "https://ggeheljnx2.execute-api.us-east-1.amazonaws.com";

/// Path of the pipelines resource on the tracking service
pub const PIPELINES_RESOURCE: &str = "/prod/pipelines";

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the tracking service (e.g., "https://example.com")
    pub api_url: String,

    /// Directory holding the user config file
    pub config_dir: PathBuf,

    /// Maximum time a request may block
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with the default service and timeout
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            config_dir,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognized environment variables (all optional):
    /// - SKYLOG_API_URL
    /// - SKYLOG_CONFIG_DIR
    /// - SKYLOG_TIMEOUT_SECS
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = lookup("SKYLOG_API_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.api_url);

        let config_dir = lookup("SKYLOG_CONFIG_DIR")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.config_dir);

        let timeout = lookup("SKYLOG_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            api_url,
            config_dir,
            timeout,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ClientError::ConfigError(format!(
                "api_url must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(ClientError::ConfigError(
                "timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(default_config_dir())
    }
}

/// `~/.skylog/stats`, or a relative `.skylog/stats` without a home directory
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".skylog")
        .join("stats")
}
