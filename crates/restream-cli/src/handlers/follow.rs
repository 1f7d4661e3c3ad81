//! Follow command: aggregate envelopes from stdin as they arrive.

use std::future::Future;
use std::sync::Arc;

use restream_runtime::{EventHub, LiveLineAggregator, follow};
use tokio::io::AsyncRead;
use tracing::{debug, info};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::LineCursor;

pub async fn execute(ctx: &CliContext, seed: &[String]) -> Result<(), CliError> {
    run(ctx, seed, tokio::io::stdin(), async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handler; only end of input stops us.
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Aggregate envelopes read from `input`, printing new lines as they are
/// applied, until the input ends or `interrupt` resolves.
///
/// On interrupt the reader is abandoned without waiting for it.
pub async fn run<R, F>(
    ctx: &CliContext,
    seed: &[String],
    input: R,
    interrupt: F,
) -> Result<(), CliError>
where
    R: AsyncRead + Unpin + Send + 'static,
    F: Future<Output = ()>,
{
    let hub = Arc::new(EventHub::new(ctx.settings.effective_channel_capacity()));
    let mut aggregator = LiveLineAggregator::initialize(
        CliContext::seed_records(seed),
        hub.as_ref(),
        &ctx.settings,
        Arc::clone(&ctx.clock),
    )?;

    let reader_hub = Arc::clone(&hub);
    let reader = tokio::spawn(async move {
        let result = follow(input, &reader_hub).await;
        reader_hub.close();
        result
    });

    let mut rx = aggregator.watch();
    let mut cursor = LineCursor::new();
    let mut interrupted = false;
    {
        let drained = aggregator.closed();
        tokio::pin!(drained);
        tokio::pin!(interrupt);

        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = rx.borrow_and_update().clone();
                    for line in cursor.take_new_lines(&state) {
                        println!("{line}");
                    }
                }
                () = &mut drained => break,
                () = &mut interrupt => {
                    debug!("Interrupted, detaching");
                    interrupted = true;
                    break;
                }
            }
        }
    }

    aggregator.teardown();
    for line in cursor.take_new_lines(&aggregator.snapshot()) {
        println!("{line}");
    }

    if interrupted {
        reader.abort();
        return Ok(());
    }

    let published = reader
        .await
        .map_err(|e| CliError::Internal(e.to_string()))??;
    info!(published, "Input ended");
    Ok(())
}
