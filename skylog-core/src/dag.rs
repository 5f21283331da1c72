//! DAG snapshots of run results
//!
//! A finished run reports a serializable snapshot of whatever the tracked
//! callable returned. Empty snapshots are dropped so the `dag` field is left
//! out of the request entirely.

use serde::Serialize;
use serde_json::Value;

/// Serialize a run result into its DAG snapshot
///
/// Returns `None` for `null`, empty objects and empty arrays, and when the
/// value cannot be represented as JSON.
pub fn snapshot<T: Serialize + ?Sized>(result: &T) -> Option<Value> {
    match serde_json::to_value(result) {
        Ok(value) if is_empty(&value) => None,
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Failed to serialize run result for DAG snapshot: {}", e);
            None
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
