//! Stream record types.

use serde::{Deserialize, Serialize};

use super::LogLine;

/// Lifecycle status of a stream as last reported by the backend roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamStatus {
    /// The backend process for this stream is alive.
    Running,
    /// The backend process exited or the stream left the roster.
    Stopped,
    /// No roster has mentioned this stream yet.
    #[default]
    #[serde(other)]
    Unknown,
}

impl StreamStatus {
    /// Lowercase label used for rendering.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Unknown => "unknown",
        }
    }
}

/// An aggregation unit: one source stream and its append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRecord {
    /// Unique, stable identifier (the source URL).
    pub id: String,
    /// Received lines in arrival order.
    #[serde(default)]
    pub output_lines: Vec<LogLine>,
    /// Last status reported by the roster.
    #[serde(default)]
    pub status: StreamStatus,
    /// Backend process id, when the roster reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
}

impl StreamRecord {
    /// Create an empty record with unknown status.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            output_lines: Vec::new(),
            status: StreamStatus::Unknown,
            pid: None,
        }
    }

    /// Builder-style status setter.
    #[must_use]
    pub const fn with_status(mut self, status: StreamStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder-style pid setter.
    #[must_use]
    pub const fn with_pid(mut self, pid: Option<u32>) -> Self {
        self.pid = pid;
        self
    }

    /// Builder-style initial log.
    #[must_use]
    pub fn with_lines(mut self, lines: Vec<LogLine>) -> Self {
        self.output_lines = lines;
        self
    }

    /// The most recently appended line, if any.
    pub fn last_line(&self) -> Option<&LogLine> {
        self.output_lines.last()
    }
}
