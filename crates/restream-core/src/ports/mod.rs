//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.

pub mod clock;
pub mod event_source;

pub use clock::{Clock, FixedClock, SystemClock};
pub use event_source::{ChannelMessage, EventSource};

#[cfg(test)]
pub use clock::MockClock;
