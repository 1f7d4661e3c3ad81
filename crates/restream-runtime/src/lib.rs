//! Runtime adapters for restream.
//!
//! - [`aggregator`] - `LiveLineAggregator`, the subscription adapter that
//!   feeds channel events into the core reducer
//! - [`hub`] - `EventHub`, an in-process connection carrying named channels
//! - [`jsonl`] - capture files of recorded transport traffic

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod aggregator;
pub mod error;
pub mod hub;
pub mod jsonl;

pub use aggregator::{EventOutcome, LiveLineAggregator, SubscriptionPhase};
pub use error::SourceError;
pub use hub::EventHub;
pub use jsonl::{Envelope, follow, load_file, publish_all, read_envelopes};

// Only used by the integration tests
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
