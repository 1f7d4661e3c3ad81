//! Domain types for stream records and their logs.
//!
//! These are pure data types with no infrastructure dependencies. The
//! aggregator owns values of these types; everything else reads them.

mod line;
mod stream;

pub use line::{LineCategory, LogLine};
pub use stream::{StreamRecord, StreamStatus};
