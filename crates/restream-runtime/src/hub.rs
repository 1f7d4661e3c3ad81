//! In-process event connection.
//!
//! `EventHub` stands in for the transport collaborator: publishers push raw
//! JSON payloads tagged with a channel name, and each subscriber gets its
//! own bounded broadcast receiver. All channels share one stream, so
//! delivery is FIFO across channels, as on a single socket.

use std::sync::{PoisonError, RwLock};

use restream_core::{ChannelMessage, EventSource};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Broadcast connection carrying channel-tagged JSON payloads.
pub struct EventHub {
    capacity: usize,
    sender: RwLock<Option<broadcast::Sender<ChannelMessage>>>,
}

impl EventHub {
    /// Create a hub that buffers up to `capacity` payloads per subscriber.
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            sender: RwLock::new(None),
        }
    }

    /// Per-subscriber buffer size.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get or open the sender.
    fn sender(&self) -> broadcast::Sender<ChannelMessage> {
        if let Some(sender) = self
            .sender
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return sender.clone();
        }

        self.sender
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert_with(|| {
                debug!(capacity = self.capacity, "Opening connection");
                broadcast::channel(self.capacity).0
            })
            .clone()
    }

    /// Publish a payload on `channel`.
    ///
    /// Returns the number of subscribers the payload was queued for.
    /// Publishing with no subscribers is not an error; the payload is
    /// discarded.
    pub fn publish(&self, channel: &str, payload: Value) -> usize {
        match self.sender().send(ChannelMessage::new(channel, payload)) {
            Ok(receivers) => receivers,
            Err(_) => {
                trace!(channel, "No subscribers, payload discarded");
                0
            }
        }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Drop the sender.
    ///
    /// Subscribers drain what is already queued and then observe the
    /// connection as closed. Subscribing afterwards opens a fresh one.
    pub fn close(&self) {
        let closed = self
            .sender
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if closed.is_some() {
            debug!("Closing connection");
        }
    }
}

impl EventSource for EventHub {
    fn subscribe(&self) -> broadcast::Receiver<ChannelMessage> {
        self.sender().subscribe()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(restream_core::DEFAULT_CHANNEL_CAPACITY)
    }
}
