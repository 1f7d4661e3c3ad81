//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for inspecting live stream output.
///
/// Global options configure which channels the aggregator attaches to;
/// each can also come from the environment or a `.env` file.
#[derive(Parser)]
#[command(name = "restream")]
#[command(about = "Aggregate live ffmpeg output per stream")]
#[command(version)]
pub struct Cli {
    /// Channel carrying output lines
    #[arg(long, global = true, env = "RESTREAM_OUTPUT_CHANNEL")]
    pub output_channel: Option<String>,

    /// Channel carrying stream roster snapshots
    #[arg(long, global = true, env = "RESTREAM_ROSTER_CHANNEL")]
    pub roster_channel: Option<String>,

    /// Per-subscriber event buffer size
    #[arg(long, global = true, env = "RESTREAM_CHANNEL_CAPACITY")]
    pub capacity: Option<usize>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
