//! Event source port.
//!
//! The transport collaborator (socket.io client, SSE bridge, in-process hub)
//! owns the connection. Every named channel arrives over that one
//! connection, so a subscriber sees a single stream of tagged payloads in
//! the order the transport received them. The aggregator drops its
//! receiver to detach.

use serde_json::Value;
use tokio::sync::broadcast;

/// One payload delivered on a named channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMessage {
    pub channel: String,
    pub payload: Value,
}

impl ChannelMessage {
    pub fn new(channel: impl Into<String>, payload: Value) -> Self {
        Self {
            channel: channel.into(),
            payload,
        }
    }
}

/// A source of channel-tagged JSON payloads.
///
/// Payloads of all channels share one FIFO stream; a source must never
/// reorder them across channels.
pub trait EventSource: Send + Sync {
    /// Attach a new receiver to the connection.
    ///
    /// The receiver sees every payload published after this call, whatever
    /// its channel. Filtering by channel is the subscriber's job.
    fn subscribe(&self) -> broadcast::Receiver<ChannelMessage>;
}
