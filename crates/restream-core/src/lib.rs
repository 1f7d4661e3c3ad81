//! Core domain for restream's live line aggregator.
//!
//! This crate holds everything that does not touch I/O:
//!
//! - [`domain`] - stream records and their log lines
//! - [`events`] - wire payloads delivered by the transport
//! - [`aggregator`] - the pure `(state, event) -> state` transitions
//! - [`ports`] - clock and event source abstractions
//! - [`settings`] - channel configuration and validation
//!
//! Adapters (the subscription pump, the CLI) live in other crates and only
//! depend on the types re-exported here.

#![deny(unused_crate_dependencies)]

pub mod aggregator;
pub mod domain;
pub mod error;
pub mod events;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use aggregator::{AggregatorState, Transition};
pub use domain::{LineCategory, LogLine, StreamRecord, StreamStatus};
pub use error::{AggregatorError, UnmatchedEventWarning};
pub use events::{BacklogLine, ChannelEvent, OutputEvent, RosterEntry, StreamsUpdate};
pub use ports::{ChannelMessage, Clock, EventSource, FixedClock, SystemClock};
pub use settings::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_OUTPUT_CHANNEL, DEFAULT_ROSTER_CHANNEL, Settings,
    SettingsError, SettingsUpdate, validate_settings,
};

// Only used by the integration tests
#[cfg(test)]
use tokio_test as _;
