//! Wire events delivered by the transport.
//!
//! # Structure
//!
//! - `output` - One output line addressed to a stream (`ffmpeg_output`)
//! - `roster` - Snapshot of the streams the backend knows (`streams_update`)
//!
//! # Wire Format
//!
//! Payloads are plain JSON objects; the channel name carries the event kind:
//!
//! ```json
//! { "url": "https://youtu.be/abc", "output": "frame=  120", "type": "stderr" }
//! ```
//!
//! Decoding is lenient: missing or `null` fields become defaults. Payloads
//! with the wrong shape fail to decode and are dropped by the adapter.

mod output;
mod roster;

use serde::{Deserialize, Deserializer};

pub use output::OutputEvent;
pub use roster::{BacklogLine, RosterEntry, StreamsUpdate};

/// A decoded event, tagged with the kind of channel it arrived on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// An output line.
    Output(OutputEvent),
    /// A roster snapshot.
    Roster(StreamsUpdate),
}

impl ChannelEvent {
    /// Get the event name for log fields.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Output(_) => "stream:output",
            Self::Roster(_) => "stream:roster",
        }
    }
}

impl From<OutputEvent> for ChannelEvent {
    fn from(event: OutputEvent) -> Self {
        Self::Output(event)
    }
}

impl From<StreamsUpdate> for ChannelEvent {
    fn from(update: StreamsUpdate) -> Self {
        Self::Roster(update)
    }
}

/// Deserialize a field, mapping an explicit `null` to `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
