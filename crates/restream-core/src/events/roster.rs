//! Stream roster snapshots (`streams_update` channel).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::null_as_default;
use crate::domain::{LineCategory, LogLine, StreamStatus};

/// Snapshot of every stream the backend currently knows about.
///
/// Broadcast by the backend whenever a stream starts or stops, and sent to
/// each client right after it connects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreamsUpdate {
    /// Known streams, in backend order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub streams: Vec<RosterEntry>,
}

impl StreamsUpdate {
    /// Create a snapshot from entries.
    pub const fn new(streams: Vec<RosterEntry>) -> Self {
        Self { streams }
    }

    /// Decode a raw channel payload.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// A single stream in a roster snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Stream identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Backend process status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: StreamStatus,
    /// Backend process id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    /// Output backlog the backend kept for this stream, if it sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Vec<BacklogLine>>,
}

impl RosterEntry {
    /// Create a roster entry without backlog.
    pub fn new(url: impl Into<String>, status: StreamStatus, pid: Option<u32>) -> Self {
        Self {
            url: url.into(),
            status,
            pid,
            output: None,
        }
    }
}

/// A backlog line carried inside a roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BacklogLine {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: LineCategory,
    /// When the backend captured the line. Absent on older backends.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Accept an RFC 3339 timestamp with offset; anything else counts as absent.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
        .map(|at| at.with_timezone(&Utc)))
}

impl BacklogLine {
    /// Convert to a log line, stamping `fallback` when no timestamp was sent.
    pub fn into_log_line(self, fallback: DateTime<Utc>) -> LogLine {
        LogLine::new(self.text, self.kind, self.timestamp.unwrap_or(fallback))
    }
}
