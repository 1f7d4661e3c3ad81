//! JSONL capture reader for replaying transport traffic.
//!
//! Each line holds one envelope: the channel name and its payload.
//!
//! ```json
//! {"event": "ffmpeg_output", "data": {"url": "a", "output": "frame=1", "type": "stderr"}}
//! ```
//!
//! ffmpeg output can contain bytes that are not valid UTF-8, so lines are
//! read as bytes and decoded lossily instead of aborting the capture.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, trace};

use crate::error::SourceError;
use crate::hub::EventHub;

/// One captured transport message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Channel name the payload was delivered on.
    pub event: String,
    /// Raw payload.
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// Parse a single capture line. Blank and unparsable lines yield `None`.
fn parse_line(line: &str) -> Option<Envelope> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match serde_json::from_str::<Envelope>(line) {
        Ok(envelope) => Some(envelope),
        Err(e) => {
            debug!(error = %e, "Skipping unparsable capture line");
            trace!(line, "Unparsable capture line");
            None
        }
    }
}

/// Read the next raw line, without its trailing newline.
///
/// Returns `Ok(None)` at EOF.
async fn next_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> std::io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

/// Read every envelope from `reader` until EOF.
pub async fn read_envelopes<R: AsyncRead + Unpin>(
    reader: R,
) -> Result<Vec<Envelope>, SourceError> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::with_capacity(1024);
    let mut envelopes = Vec::new();

    while let Some(line) = next_line(&mut reader, &mut buf).await? {
        envelopes.extend(parse_line(&line));
    }

    debug!(count = envelopes.len(), "Read capture");
    Ok(envelopes)
}

/// Read every envelope from a capture file.
pub async fn load_file(path: &Path) -> Result<Vec<Envelope>, SourceError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    read_envelopes(file).await
}

/// Publish envelopes on the hub in order.
///
/// Returns how many envelopes reached at least one subscriber.
pub fn publish_all(hub: &EventHub, envelopes: impl IntoIterator<Item = Envelope>) -> usize {
    envelopes
        .into_iter()
        .filter(|envelope| hub.publish(&envelope.event, envelope.data.clone()) > 0)
        .count()
}

/// Publish envelopes from `reader` onto the hub as they arrive.
///
/// Runs until EOF and returns the number of envelopes published. The hub
/// is left open; callers close it when the source is exhausted.
pub async fn follow<R: AsyncRead + Unpin>(reader: R, hub: &EventHub) -> Result<usize, SourceError> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::with_capacity(1024);
    let mut published = 0;

    while let Some(line) = next_line(&mut reader, &mut buf).await? {
        if let Some(envelope) = parse_line(&line) {
            hub.publish(&envelope.event, envelope.data);
            published += 1;
        }
    }

    debug!(published, "Capture source reached EOF");
    Ok(published)
}
