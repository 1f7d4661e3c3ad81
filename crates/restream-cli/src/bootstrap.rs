//! CLI bootstrap - the composition root.
//!
//! Global flags are layered over the default settings here, validated,
//! and bundled with the clock into the context every handler receives.

use std::sync::Arc;

use restream_core::{Clock, Settings, SettingsUpdate, StreamRecord, SystemClock, validate_settings};

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub output_channel: Option<String>,
    pub roster_channel: Option<String>,
    pub capacity: Option<usize>,
}

impl CliConfig {
    /// Take the overrides given on the command line or in the environment.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            output_channel: cli.output_channel.clone(),
            roster_channel: cli.roster_channel.clone(),
            capacity: cli.capacity,
        }
    }

    fn as_update(&self) -> SettingsUpdate {
        SettingsUpdate {
            output_channel: self.output_channel.clone().map(Some),
            roster_channel: self.roster_channel.clone().map(Some),
            channel_capacity: self.capacity.map(Some),
        }
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub settings: Settings,
    pub clock: Arc<dyn Clock>,
}

impl CliContext {
    /// Seed records for the given ids, in the order given.
    pub fn seed_records(ids: &[String]) -> Vec<StreamRecord> {
        ids.iter().map(StreamRecord::new).collect()
    }
}

/// Build the CLI context from configuration.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext, CliError> {
    let mut settings = Settings::with_defaults();
    settings.merge(&config.as_update());
    validate_settings(&settings)?;

    tracing::debug!(?settings, "CLI settings resolved");

    Ok(CliContext {
        settings,
        clock: Arc::new(SystemClock::new()),
    })
}
