//! Pipeline DTOs for the tracking service

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::pipeline::{PipelineRecord, PipelineStatus, field_text};
use crate::humanize::describe_last_run;

/// Body of a POST to the pipelines resource
///
/// Optional fields are omitted from the JSON when absent or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritePipeline {
    pub pipeline_id: String,
    pub status: PipelineStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dag: Option<serde_json::Value>,
}

impl WritePipeline {
    pub fn new(pipeline_id: impl Into<String>, status: PipelineStatus) -> Self {
        Self {
            pipeline_id: pipeline_id.into(),
            status,
            pipeline_name: None,
            log: None,
            dag: None,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.pipeline_name = name.filter(|n| !n.is_empty());
        self
    }

    pub fn with_log(mut self, log: Option<String>) -> Self {
        self.log = log.filter(|l| !l.is_empty());
        self
    }

    pub fn with_dag(mut self, dag: Option<serde_json::Value>) -> Self {
        self.dag = dag.filter(|d| !d.is_null());
        self
    }
}

/// Filters for a GET on the pipelines resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineQuery {
    pub pipeline_id: Option<String>,
    pub verbose: bool,
}

impl PipelineQuery {
    pub fn new(pipeline_id: Option<&str>, verbose: bool) -> Self {
        Self {
            pipeline_id: pipeline_id.filter(|id| !id.is_empty()).map(str::to_string),
            verbose,
        }
    }
}

/// A fetched pipeline record with a human readable `updated` field
///
/// Other fields are carried over from [`PipelineRecord`] untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    #[serde(default)]
    pub pipeline_id: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dag: Option<Value>,
    /// Last run, e.g. `"2 hours ago (Nov 14, 2023 at 22:13)"`
    pub updated: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl PipelineRun {
    /// Build a display record, describing `updated` relative to `now`
    pub fn from_record<Tz: TimeZone>(record: PipelineRecord, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            updated: describe_last_run(record.updated.as_ref(), now),
            pipeline_id: record.pipeline_id,
            status: record.status,
            pipeline_name: record.pipeline_name,
            log: record.log,
            dag: record.dag,
            extra: record.extra,
        }
    }

    pub fn pipeline_id_text(&self) -> Option<String> {
        self.pipeline_id.as_ref().map(field_text)
    }

    pub fn pipeline_name_text(&self) -> Option<String> {
        self.pipeline_name.as_ref().map(field_text)
    }

    pub fn status_text(&self) -> Option<String> {
        self.status.as_ref().map(field_text)
    }

    pub fn log_text(&self) -> Option<String> {
        self.log.as_ref().map(field_text)
    }

    /// Status parsed into the known set, if it is one of them
    pub fn parsed_status(&self) -> Option<PipelineStatus> {
        self.status
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }
}
