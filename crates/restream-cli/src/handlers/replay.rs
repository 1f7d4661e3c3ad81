//! Replay command: aggregate a recorded capture and print the result.

use std::path::Path;
use std::sync::Arc;

use restream_core::AggregatorState;
use restream_runtime::{EventHub, LiveLineAggregator, load_file, publish_all, read_envelopes};
use tracing::info;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::render_streams;

/// Feed every envelope of the capture through a fresh aggregator and
/// return the final state.
pub async fn aggregate(
    ctx: &CliContext,
    seed: &[String],
    file: Option<&Path>,
) -> Result<AggregatorState, CliError> {
    let envelopes = match file {
        Some(path) => load_file(path).await?,
        None => read_envelopes(tokio::io::stdin()).await?,
    };

    // The whole capture is published before the pump catches up, so the
    // buffer must hold all of it or the receiver would lag.
    let hub = EventHub::new(
        ctx.settings
            .effective_channel_capacity()
            .max(envelopes.len()),
    );
    let mut aggregator = LiveLineAggregator::initialize(
        CliContext::seed_records(seed),
        &hub,
        &ctx.settings,
        Arc::clone(&ctx.clock),
    )?;

    let total = envelopes.len();
    let delivered = publish_all(&hub, envelopes);
    hub.close();
    aggregator.closed().await;

    let state = aggregator.snapshot();
    aggregator.teardown();

    info!(
        envelopes = total,
        delivered,
        streams = state.len(),
        lines = state.line_count(),
        "Replay finished"
    );
    Ok(state)
}

pub async fn execute(
    ctx: &CliContext,
    seed: &[String],
    file: Option<&Path>,
    json: bool,
) -> Result<(), CliError> {
    let state = aggregate(ctx, seed, file).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", render_streams(&state));
    }
    Ok(())
}
