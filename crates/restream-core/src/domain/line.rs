//! Log line types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category tag attached to every log line.
///
/// Travels on the wire as a plain string (`"type"` in the output payload).
/// The tags the backend is known to emit get their own variants; anything
/// else is preserved verbatim so rendering can still style it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LineCategory {
    /// Process standard output.
    Stdout,
    /// Process standard error (ffmpeg writes its progress here).
    Stderr,
    /// Informational message.
    #[default]
    Info,
    /// Error message.
    Error,
    /// Any tag not listed above.
    Other(String),
}

impl LineCategory {
    /// The wire representation of this category.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
            Self::Info => "info",
            Self::Error => "error",
            Self::Other(tag) => tag,
        }
    }
}

impl From<&str> for LineCategory {
    fn from(tag: &str) -> Self {
        match tag {
            "stdout" => Self::Stdout,
            "stderr" => Self::Stderr,
            "info" => Self::Info,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for LineCategory {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "stdout" | "stderr" | "info" | "error" => Self::from(tag.as_str()),
            _ => Self::Other(tag),
        }
    }
}

impl From<LineCategory> for String {
    fn from(category: LineCategory) -> Self {
        match category {
            LineCategory::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LineCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timestamped, categorized entry in a stream's log.
///
/// Lines are immutable once appended; their position in the log is the
/// order they arrived in, not the order of `observed_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLine {
    /// The line content (without trailing newline).
    pub text: String,
    /// Category tag used for styling.
    pub category: LineCategory,
    /// When the aggregator received the line.
    pub observed_at: DateTime<Utc>,
}

impl LogLine {
    /// Create a new log line.
    pub fn new(
        text: impl Into<String>,
        category: impl Into<LineCategory>,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            observed_at,
        }
    }
}
