//! CLI-specific error types and mappings.
//!
//! This module provides the CLI error type and its mapping to exit codes.

use restream_core::{AggregatorError, SettingsError};
use restream_runtime::SourceError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The seed list was rejected.
    #[error("Invalid seed: {0}")]
    Seed(#[from] AggregatorError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] SettingsError),

    /// Capture could not be read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Output could not be written.
    #[error("Output error: {0}")]
    Output(String),

    /// A background task failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Seed(_) => 2,      // EX_USAGE
            Self::Source(_) => 66,   // EX_NOINPUT
            Self::Output(_) => 74,   // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Internal(_) => 1,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}
