//! Aggregator error and warning types.

use thiserror::Error;

/// Errors raised while building aggregator state.
///
/// These are the only failures the aggregator reports; everything that can
/// go wrong while events are flowing is a warning, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregatorError {
    /// Two seed records share an identifier.
    #[error("Duplicate stream id in seed: {0}")]
    DuplicateId(String),

    /// A seed record has an empty identifier.
    #[error("Stream id cannot be empty")]
    EmptyId,
}

/// An event addressed a stream the aggregator does not know.
///
/// Non-fatal: the event is dropped and the state is left untouched. This
/// is expected for events that race ahead of the roster announcing their
/// stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No stream record matches event for {url}")]
pub struct UnmatchedEventWarning {
    /// Identifier carried by the dropped event.
    pub url: String,
}

impl UnmatchedEventWarning {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AggregatorError::DuplicateId("a".to_string()).to_string(),
            "Duplicate stream id in seed: a"
        );
        assert_eq!(
            UnmatchedEventWarning::new("b").to_string(),
            "No stream record matches event for b"
        );
    }
}
