//! Text rendering of the aggregated stream collection.

use std::collections::HashMap;
use std::fmt::Write;

use restream_core::{AggregatorState, LogLine, StreamRecord};

use super::tables::{format_optional, truncate_string};

/// Widest stream id shown as a line prefix in follow mode.
const PREFIX_WIDTH: usize = 48;

fn header(record: &StreamRecord) -> String {
    format!(
        "{} ({}, pid {})",
        record.id,
        record.status.as_str(),
        format_optional(record.pid.as_ref(), "-")
    )
}

fn body_line(line: &LogLine) -> String {
    format!("  [{}] {}", line.category, line.text)
}

/// Render every record in collection order, each with its lines.
pub fn render_streams(state: &AggregatorState) -> String {
    if state.is_empty() {
        return "No streams.\n".to_string();
    }

    let mut out = String::new();
    for record in state.records() {
        let _ = writeln!(out, "{}", header(record));
        if record.output_lines.is_empty() {
            out.push_str("  (no output)\n");
        }
        for line in &record.output_lines {
            let _ = writeln!(out, "{}", body_line(line));
        }
    }
    out
}

/// Tracks how much of each record has been printed in follow mode.
#[derive(Debug, Default)]
pub struct LineCursor {
    printed: HashMap<String, usize>,
}

impl LineCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines appended since the previous call, formatted with their stream
    /// id as prefix. Records keep their collection order.
    pub fn take_new_lines(&mut self, state: &AggregatorState) -> Vec<String> {
        let mut fresh = Vec::new();
        for record in state.records() {
            let seen = self.printed.entry(record.id.clone()).or_default();
            let prefix = truncate_string(&record.id, PREFIX_WIDTH);
            for line in record.output_lines.iter().skip(*seen) {
                fresh.push(format!("[{prefix}] {}: {}", line.category, line.text));
            }
            *seen = record.output_lines.len();
        }
        fresh
    }
}
