//! Runtime adapter errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors while reading recorded transport traffic.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The capture file could not be opened.
    #[error("Failed to open capture {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from the capture failed part way through.
    #[error("Failed to read capture: {0}")]
    Read(#[from] std::io::Error),
}
