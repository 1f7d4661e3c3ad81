//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<(), CliError>`
//! - Thin wrappers that wire the hub and aggregator, then format output
//!
//! Handlers should NOT contain state transitions; those belong to
//! `restream_core::aggregator`.

pub mod follow;
pub mod replay;
