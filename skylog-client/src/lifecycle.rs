//! Run lifecycle tracking
//!
//! [`LifecycleTracker`] wraps an async callable and reports its run to the
//! tracking service: `started` before the call, then `finished` with a DAG
//! snapshot of the result, or `error` with the error text. Reporting is best
//! effort: failed reports are logged as warnings and never change what the
//! callable returned.

use serde::Serialize;
use serde_json::{Map, Value};
use skylog_core::dag;
use skylog_core::domain::pipeline::PipelineStatus;
use skylog_core::dto::pipeline::WritePipeline;
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::CloudClient;
use crate::error::ClientError;

/// Accumulator handed to callables tracked in payload mode
///
/// Whatever the callable inserts is sent as the `log` of the final report.
/// Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    entries: Arc<Mutex<Map<String, Value>>>,
}

impl Payload {
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.lock().insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Current contents as a JSON object
    pub fn snapshot(&self) -> Value {
        Value::Object(self.lock().clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Map<String, Value>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn to_log(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.snapshot().to_string())
        }
    }
}

/// Reports the lifecycle of wrapped calls to the tracking service
#[derive(Clone)]
pub struct LifecycleTracker {
    client: CloudClient,
    pipeline_name: Option<String>,
}

impl LifecycleTracker {
    pub fn new(client: CloudClient) -> Self {
        Self {
            client,
            pipeline_name: None,
        }
    }

    /// Send `name` as the pipeline name with every report
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.pipeline_name = Some(name.into());
        self
    }

    /// Run `f` and report its lifecycle under a fresh pipeline id
    ///
    /// The result of `f` is returned unchanged, including its error.
    ///
    /// # Example
    /// ```no_run
    /// # use skylog_client::{ClientConfig, CloudClient, LifecycleTracker};
    /// # async fn example() -> anyhow::Result<()> {
    /// let tracker = LifecycleTracker::new(CloudClient::new(&ClientConfig::default())?)
    ///     .with_name("nightly-etl");
    ///
    /// let rows = tracker
    ///     .track(|| async { Ok::<_, std::io::Error>(vec!["extract", "load"]) })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn track<F, Fut, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        T: Serialize,
        E: Display,
    {
        self.run(|_payload| f()).await
    }

    /// Like [`track`](Self::track), but `f` receives an empty [`Payload`]
    /// to fill with data for the final report
    pub async fn track_with_payload<F, Fut, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(Payload) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        T: Serialize,
        E: Display,
    {
        self.run(f).await
    }

    async fn run<F, Fut, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(Payload) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        T: Serialize,
        E: Display,
    {
        let pipeline_id = Uuid::new_v4().to_string();
        let payload = Payload::default();

        self.report(self.body(&pipeline_id, PipelineStatus::Started))
            .await;

        match f(payload.clone()).await {
            Err(e) => {
                let log = match payload.to_log() {
                    Some(extra) => format!("{}\n{}", e, extra),
                    None => e.to_string(),
                };
                self.report(self.body(&pipeline_id, PipelineStatus::Error).with_log(Some(log)))
                    .await;
                Err(e)
            }
            Ok(result) => {
                let body = self
                    .body(&pipeline_id, PipelineStatus::Finished)
                    .with_dag(dag::snapshot(&result))
                    .with_log(payload.to_log());
                self.report(body).await;
                Ok(result)
            }
        }
    }

    fn body(&self, pipeline_id: &str, status: PipelineStatus) -> WritePipeline {
        WritePipeline::new(pipeline_id, status).with_name(self.pipeline_name.clone())
    }

    async fn report(&self, body: WritePipeline) {
        match self.client.write_body(&body).await {
            Ok(response) if response.contains("Error") => {
                tracing::warn!(
                    pipeline_id = %body.pipeline_id,
                    status = %body.status,
                    "Pipeline status report was rejected: {}",
                    response
                );
            }
            Ok(_) => {
                tracing::debug!(
                    pipeline_id = %body.pipeline_id,
                    status = %body.status,
                    "Reported pipeline status"
                );
            }
            Err(ClientError::MissingApiKey) => {
                tracing::debug!(
                    pipeline_id = %body.pipeline_id,
                    status = %body.status,
                    "Skipping pipeline status report: no API key"
                );
            }
            Err(e) => {
                tracing::warn!(
                    pipeline_id = %body.pipeline_id,
                    status = %body.status,
                    "Error reporting pipeline status: {}",
                    e
                );
            }
        }
    }
}
