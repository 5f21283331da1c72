//! Skylog HTTP Client
//!
//! A small, type-safe client for the remote pipeline tracking service.
//!
//! The client stores the user's API key in a local config file and reports
//! pipeline runs with three calls against a single resource: fetch history
//! (GET), write a status (POST) and delete a record (DELETE). The
//! [`LifecycleTracker`] wraps an async callable and reports its
//! `started` / `finished` / `error` lifecycle around it.
//!
//! # Example
//!
//! ```no_run
//! use skylog_client::{ClientConfig, CloudClient, PipelineUpdate};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CloudClient::new(&ClientConfig::from_env())?;
//!
//!     let id = uuid::Uuid::new_v4().to_string();
//!     client
//!         .write_pipeline(PipelineUpdate::new(&id, "started").name("nightly-etl"))
//!         .await?;
//!
//!     for run in client.get_pipeline(Some(&id), false).await? {
//!         println!("{:?}: {}", run.status, run.updated);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod key_store;
pub mod lifecycle;
mod pipelines;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ClientError, ErrorKind, Result};
pub use key_store::{FileKeyStore, KeyStore};
pub use lifecycle::{LifecycleTracker, Payload};
pub use pipelines::PipelineUpdate;
pub use skylog_core::domain::pipeline::PipelineStatus;
pub use skylog_core::dto::pipeline::PipelineRun;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

use skylog_core::domain::key::ApiKey;
use std::sync::Arc;

/// Client for the pipeline tracking service
///
/// Cheap to clone; clones share the key store and HTTP client handle.
#[derive(Clone)]
pub struct CloudClient {
    key_store: Arc<dyn KeyStore>,
    transport: Arc<dyn Transport>,
}

impl CloudClient {
    /// Create a client backed by the user config file and an HTTP transport
    ///
    /// # Arguments
    /// * `config` - Service URL, config directory and request timeout
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let key_store = FileKeyStore::new(&config.config_dir);
        let transport = HttpTransport::new(&config.api_url, config.timeout)?;

        Ok(Self::with_parts(Arc::new(key_store), Arc::new(transport)))
    }

    /// Create a client from an explicit key store and transport
    pub fn with_parts(key_store: Arc<dyn KeyStore>, transport: Arc<dyn Transport>) -> Self {
        Self {
            key_store,
            transport,
        }
    }

    // =============================================================================
    // Key Management
    // =============================================================================

    /// Get the stored API key, if any
    pub fn get_key(&self) -> Result<Option<String>> {
        self.key_store.get_key()
    }

    /// Validate and store the user's API key
    ///
    /// A malformed key is reported as a warning and nothing is written.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidKey`] for malformed keys, or a
    /// configuration error if the config file cannot be written.
    pub fn set_key(&self, key: &str) -> Result<ApiKey> {
        let key = match ApiKey::parse(key) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(
                    "The API key is malformed ({}). Please validate your key or contact the admin",
                    e
                );
                return Err(e.into());
            }
        };

        self.key_store.store_key(&key)?;
        tracing::info!("Key was stored");

        Ok(key)
    }

    /// Stored key, or [`ClientError::MissingApiKey`]
    fn api_key(&self) -> Result<String> {
        match self.key_store.get_key()? {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ClientError::MissingApiKey),
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Send a request and return the body of a successful response
    async fn execute(&self, request: ApiRequest) -> Result<String> {
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(ClientError::api_error(response.status, response.body));
        }

        Ok(response.body)
    }
}
