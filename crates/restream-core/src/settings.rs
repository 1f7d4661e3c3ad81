//! Settings domain types and validation.
//!
//! Pure configuration types with no infrastructure dependencies. Adapters
//! fill them from flags, environment or files and validate before use.

use serde::{Deserialize, Serialize};

/// Default channel carrying process output lines.
pub const DEFAULT_OUTPUT_CHANNEL: &str = "ffmpeg_output";

/// Default channel carrying stream roster snapshots.
pub const DEFAULT_ROSTER_CHANNEL: &str = "streams_update";

/// Default per-subscriber buffer size.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Largest accepted per-subscriber buffer size.
pub const MAX_CHANNEL_CAPACITY: usize = 1 << 20;

/// Aggregator settings.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Channel the aggregator attaches its output handler to.
    pub output_channel: Option<String>,

    /// Channel the aggregator attaches its roster handler to.
    pub roster_channel: Option<String>,

    /// Buffer size for each in-process channel.
    pub channel_capacity: Option<usize>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            output_channel: Some(DEFAULT_OUTPUT_CHANNEL.to_string()),
            roster_channel: Some(DEFAULT_ROSTER_CHANNEL.to_string()),
            channel_capacity: Some(DEFAULT_CHANNEL_CAPACITY),
        }
    }

    /// Get the effective output channel name (with default fallback).
    pub fn effective_output_channel(&self) -> &str {
        self.output_channel
            .as_deref()
            .unwrap_or(DEFAULT_OUTPUT_CHANNEL)
    }

    /// Get the effective roster channel name (with default fallback).
    pub fn effective_roster_channel(&self) -> &str {
        self.roster_channel
            .as_deref()
            .unwrap_or(DEFAULT_ROSTER_CHANNEL)
    }

    /// Get the effective channel capacity (with default fallback).
    #[must_use]
    pub const fn effective_channel_capacity(&self) -> usize {
        match self.channel_capacity {
            Some(capacity) => capacity,
            None => DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref channel) = other.output_channel {
            self.output_channel.clone_from(channel);
        }
        if let Some(ref channel) = other.roster_channel {
            self.roster_channel.clone_from(channel);
        }
        if let Some(ref capacity) = other.channel_capacity {
            self.channel_capacity = *capacity;
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = reset field to its default
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub output_channel: Option<Option<String>>,
    pub roster_channel: Option<Option<String>>,
    pub channel_capacity: Option<Option<usize>>,
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Channel name cannot be empty")]
    EmptyChannelName,

    #[error("Output and roster channels must differ, both are {0:?}")]
    SameChannel(String),

    #[error("Channel capacity must be between 1 and {max}, got {0}", max = MAX_CHANNEL_CAPACITY)]
    InvalidCapacity(usize),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    let output = settings.effective_output_channel();
    let roster = settings.effective_roster_channel();

    if output.trim().is_empty() || roster.trim().is_empty() {
        return Err(SettingsError::EmptyChannelName);
    }

    if output == roster {
        return Err(SettingsError::SameChannel(output.to_string()));
    }

    let capacity = settings.effective_channel_capacity();
    if !(1..=MAX_CHANNEL_CAPACITY).contains(&capacity) {
        return Err(SettingsError::InvalidCapacity(capacity));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::with_defaults();
        assert_eq!(settings.effective_output_channel(), "ffmpeg_output");
        assert_eq!(settings.effective_roster_channel(), "streams_update");
        assert_eq!(settings.effective_channel_capacity(), 1024);
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_empty_settings_fall_back_to_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.effective_output_channel(), DEFAULT_OUTPUT_CHANNEL);
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_validate_empty_channel() {
        let settings = Settings {
            output_channel: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::EmptyChannelName)
        );
    }

    #[test]
    fn test_validate_same_channel() {
        let settings = Settings {
            output_channel: Some("events".to_string()),
            roster_channel: Some("events".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::SameChannel(_))
        ));
    }

    #[test]
    fn test_validate_zero_capacity() {
        let settings = Settings {
            channel_capacity: Some(0),
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::InvalidCapacity(0))
        );
    }

    #[test]
    fn test_merge_only_touches_given_fields() {
        let mut settings = Settings::with_defaults();
        settings.merge(&SettingsUpdate {
            output_channel: Some(Some("encoder_output".to_string())),
            channel_capacity: Some(None),
            ..Default::default()
        });

        assert_eq!(settings.effective_output_channel(), "encoder_output");
        assert_eq!(settings.roster_channel.as_deref(), Some("streams_update"));
        assert_eq!(settings.channel_capacity, None);
    }
}
