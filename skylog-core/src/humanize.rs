//! Human readable "last run" descriptions
//!
//! The tracking service reports `updated` as seconds since the epoch. For
//! display it is turned into `"<relative> (<Mon DD, YYYY at HH:MM>)"`, e.g.
//! `"3 days ago (Nov 14, 2023 at 22:13)"`.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde_json::Value;

/// Shown for records that never reported a timestamp
pub const NEVER_RUN: &str = "Has not been run";

const ABSOLUTE_FORMAT: &str = "%b %d, %Y at %H:%M";

/// Describe a raw `updated` value relative to `now`
///
/// Absent or null values yield [`NEVER_RUN`]. Values that cannot be read as
/// a timestamp are returned as their raw text.
pub fn describe_last_run<Tz: TimeZone>(updated: Option<&Value>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let raw = match updated {
        None | Some(Value::Null) => return NEVER_RUN.to_string(),
        Some(value) => value,
    };

    match parse_timestamp(raw) {
        Some(at) => {
            let local = at.with_timezone(&now.timezone());
            format!(
                "{} ({})",
                natural_time(now.clone() - local.clone()),
                local.format(ABSOLUTE_FORMAT)
            )
        }
        None => raw_text(raw),
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let seconds = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !seconds.is_finite() {
        return None;
    }

    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9) as u32;
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(whole as i64, nanos)
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Relative description of a time delta, e.g. `"5 minutes ago"`
///
/// Positive deltas are in the past, negative ones in the future.
pub fn natural_time(delta: TimeDelta) -> String {
    let seconds = delta.num_seconds();
    let text = natural_delta(seconds.unsigned_abs());

    if text == "a moment" {
        "now".to_string()
    } else if seconds < 0 {
        format!("{} from now", text)
    } else {
        format!("{} ago", text)
    }
}

fn natural_delta(total_seconds: u64) -> String {
    let total_days = total_seconds / 86_400;
    let seconds = total_seconds % 86_400;
    let years = total_days / 365;
    let days = total_days % 365;
    let months = (days as f64 / 30.5) as u64;

    match years {
        0 if days == 0 => match seconds {
            0 => "a moment".to_string(),
            1 => "a second".to_string(),
            2..=59 => format!("{} seconds", seconds),
            60..=119 => "a minute".to_string(),
            120..=3599 => format!("{} minutes", seconds / 60),
            3600..=7199 => "an hour".to_string(),
            _ => format!("{} hours", seconds / 3600),
        },
        0 => match (days, months) {
            (1, _) => "a day".to_string(),
            (_, 0) => format!("{} days", days),
            (_, 1) => "a month".to_string(),
            _ => format!("{} months", months),
        },
        1 => match (days, months) {
            (0, _) => "a year".to_string(),
            (1, 0) => "1 year, 1 day".to_string(),
            (_, 0) => format!("1 year, {} days", days),
            (_, 1) => "1 year, 1 month".to_string(),
            _ => format!("1 year, {} months", months),
        },
        _ => format!("{} years", years),
    }
}
