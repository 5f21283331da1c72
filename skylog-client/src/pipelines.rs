//! Pipeline-related API endpoints

use chrono::Local;
use reqwest::Method;
use skylog_core::domain::pipeline::{PipelineRecord, PipelineStatus};
use skylog_core::dto::pipeline::{PipelineQuery, PipelineRun, WritePipeline};

use crate::CloudClient;
use crate::error::{ClientError, Result};
use crate::transport::ApiRequest;

/// A status report for one pipeline, as given by a caller
///
/// Inputs are kept as plain strings so missing or unknown values are
/// reported by [`CloudClient::write_pipeline`] rather than by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineUpdate {
    pub pipeline_id: String,
    pub status: String,
    pub log: Option<String>,
    pub pipeline_name: Option<String>,
    pub dag: Option<serde_json::Value>,
}

impl PipelineUpdate {
    pub fn new(pipeline_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            pipeline_id: pipeline_id.into(),
            status: status.into(),
            ..Default::default()
        }
    }

    pub fn log(mut self, log: impl Into<String>) -> Self {
        self.log = Some(log.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.pipeline_name = Some(name.into());
        self
    }

    pub fn dag(mut self, dag: serde_json::Value) -> Self {
        self.dag = Some(dag);
        self
    }

    /// Validate the update and turn it into a request body
    pub fn into_body(self) -> Result<WritePipeline> {
        if self.pipeline_id.is_empty() {
            return Err(ClientError::MissingPipelineId);
        }
        let status: PipelineStatus = self.status.parse()?;

        Ok(WritePipeline::new(self.pipeline_id, status)
            .with_name(self.pipeline_name)
            .with_log(self.log)
            .with_dag(self.dag))
    }
}

impl CloudClient {
    // =============================================================================
    // Pipeline Management
    // =============================================================================

    /// Fetch pipeline history
    ///
    /// # Arguments
    /// * `pipeline_id` - Only return this pipeline
    /// * `verbose` - Ask the service for full records
    ///
    /// # Returns
    /// The pipeline runs, each with a human readable `updated` field
    ///
    /// # Example
    /// ```no_run
    /// # use skylog_client::{ClientConfig, CloudClient};
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = CloudClient::new(&ClientConfig::default())?;
    /// for run in client.get_pipeline(None, false).await? {
    ///     println!("{:?} last ran {}", run.pipeline_id, run.updated);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_pipeline(
        &self,
        pipeline_id: Option<&str>,
        verbose: bool,
    ) -> Result<Vec<PipelineRun>> {
        let key = self.api_key()?;
        let query = PipelineQuery::new(pipeline_id, verbose);

        let mut request = ApiRequest::new(Method::GET).header("api_key", key);
        if let Some(id) = query.pipeline_id {
            request = request.header("pipeline_id", id);
        }
        if query.verbose {
            request = request.header("verbose", "True");
        }

        let body = self.execute(request).await?;
        let records: Vec<PipelineRecord> =
            serde_json::from_str(&body).map_err(|e| ClientError::ParseError {
                message: e.to_string(),
                body: body.clone(),
            })?;

        let now = Local::now();
        Ok(records
            .into_iter()
            .map(|record| PipelineRun::from_record(record, &now))
            .collect())
    }

    /// Write a pipeline status
    ///
    /// The service creates the record on first write and updates it after.
    ///
    /// # Arguments
    /// * `update` - Pipeline id, status and optional name, log and DAG
    ///
    /// # Returns
    /// The raw response body
    pub async fn write_pipeline(&self, update: PipelineUpdate) -> Result<String> {
        let key = self.api_key()?;
        let body = update.into_body()?;

        self.post_pipeline(key, &body).await
    }

    /// Write an already validated request body
    pub(crate) async fn write_body(&self, body: &WritePipeline) -> Result<String> {
        let key = self.api_key()?;
        if body.pipeline_id.is_empty() {
            return Err(ClientError::MissingPipelineId);
        }

        self.post_pipeline(key, body).await
    }

    async fn post_pipeline(&self, key: String, body: &WritePipeline) -> Result<String> {
        let json = serde_json::to_string(body).map_err(|e| {
            ClientError::ConfigError(format!("Failed to serialize pipeline body: {}", e))
        })?;

        let request = ApiRequest::new(Method::POST)
            .header("api_key", key)
            .json_body(json);

        self.execute(request).await
    }

    /// Delete a pipeline record
    ///
    /// # Arguments
    /// * `pipeline_id` - The pipeline to delete
    ///
    /// # Returns
    /// The raw response body
    pub async fn delete_pipeline(&self, pipeline_id: &str) -> Result<String> {
        let key = self.api_key()?;
        if pipeline_id.is_empty() {
            return Err(ClientError::MissingPipelineId);
        }

        let request = ApiRequest::new(Method::DELETE)
            .header("api_key", key)
            .header("pipeline_id", pipeline_id);

        self.execute(request).await
    }
}
