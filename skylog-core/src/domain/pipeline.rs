//! Pipeline domain types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Status of a tracked pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Started,
    Finished,
    Error,
}

impl PipelineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStatus::Started => "started",
            PipelineStatus::Finished => "finished",
            PipelineStatus::Error => "error",
        }
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while parsing a status from user input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("status is empty")]
    Empty,

    #[error("unknown status '{0}' (expected started, finished or error)")]
    Unknown(String),
}

impl FromStr for PipelineStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Err(StatusError::Empty),
            "started" => Ok(PipelineStatus::Started),
            "finished" => Ok(PipelineStatus::Finished),
            "error" => Ok(PipelineStatus::Error),
            _ => Err(StatusError::Unknown(s.to_string())),
        }
    }
}

/// Pipeline record as returned by the remote service
///
/// The service owns this entity. Only `updated` is interpreted by this
/// client; every other field is passed through as whatever JSON the service
/// sent, so a record with an unexpected field type still decodes. Fields
/// this client does not know about are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRecord {
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
    /// Seconds since epoch, as a number or a numeric string
    #[serde(default)]
    pub updated: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Display text of a passed-through field: strings as-is, anything else as JSON
pub fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(PipelineStatus::Finished).unwrap(),
            json!("finished")
        );
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("started".parse(), Ok(PipelineStatus::Started));
        assert_eq!(" ERROR ".parse(), Ok(PipelineStatus::Error));
        assert_eq!("".parse::<PipelineStatus>(), Err(StatusError::Empty));
        assert!(matches!(
            "running".parse::<PipelineStatus>(),
            Err(StatusError::Unknown(_))
        ));
    }

    #[test]
    fn test_record_keeps_unknown_fields() {
        let record: PipelineRecord = serde_json::from_value(json!({
            "pipeline_id": "abc",
            "status": "finished",
            "updated": 1700000000,
            "owner": "someone"
        }))
        .unwrap();

        assert_eq!(record.pipeline_id, Some(json!("abc")));
        assert_eq!(record.status, Some(json!("finished")));
        assert_eq!(record.updated, Some(json!(1700000000)));
        assert_eq!(record.extra.get("owner"), Some(&json!("someone")));
    }

    #[test]
    fn test_record_accepts_non_string_fields() {
        let record: PipelineRecord = serde_json::from_value(json!({
            "pipeline_id": 42,
            "status": "error",
            "log": ["ValueError", "boom"],
            "pipeline_name": null
        }))
        .unwrap();

        assert_eq!(record.pipeline_id, Some(json!(42)));
        assert_eq!(record.log, Some(json!(["ValueError", "boom"])));
        assert!(record.pipeline_name.is_none());
    }

    #[test]
    fn test_record_tolerates_missing_fields() {
        let record: PipelineRecord = serde_json::from_value(json!({})).unwrap();
        assert!(record.pipeline_id.is_none());
        assert!(record.status.is_none());
        assert!(record.updated.is_none());
    }

    #[test]
    fn test_field_text() {
        assert_eq!(field_text(&json!("abc")), "abc");
        assert_eq!(field_text(&json!(42)), "42");
        assert_eq!(field_text(&json!(["a", 1])), r#"["a",1]"#);
    }
}
