//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: no state transitions happen here.

pub mod streams;
pub mod tables;

pub use streams::{LineCursor, render_streams};
pub use tables::{format_optional, truncate_string};
