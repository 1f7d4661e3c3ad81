//! Live line aggregator: the subscription adapter around the reducer.
//!
//! `LiveLineAggregator` attaches to an [`EventSource`], picks the output
//! and roster channels out of its single ordered stream, decodes each
//! payload and feeds it through the pure transitions in
//! [`restream_core::aggregator`]. Payloads are applied in the order the
//! source delivered them, across both channels. It is the single writer of
//! the state; readers get immutable snapshots or a `watch` feed.
//!
//! # Lifecycle
//!
//! ```text
//! initialize() ──► Subscribed ──teardown()/drop──► Unsubscribed (terminal)
//!                   ▲      │
//!                   └──────┘ event
//! ```
//!
//! Applying an event and flipping the phase happen under the same lock,
//! so once `teardown` returns no further event can change the state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use restream_core::{
    AggregatorError, AggregatorState, ChannelMessage, Clock, EventSource, OutputEvent, Settings,
    StreamRecord, StreamsUpdate, UnmatchedEventWarning,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Whether the aggregator is still attached to its channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionPhase {
    /// Receiving and applying events.
    Subscribed,
    /// Torn down. Terminal.
    Unsubscribed,
}

/// What happened to a single delivered event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The state changed.
    Applied,
    /// The event named an unknown stream and was dropped.
    Unmatched(UnmatchedEventWarning),
    /// The event arrived after teardown and was ignored.
    Ignored,
}

struct Shared {
    phase: SubscriptionPhase,
    state: AggregatorState,
}

struct Inner {
    shared: Mutex<Shared>,
    view: watch::Sender<AggregatorState>,
    clock: Arc<dyn Clock>,
    output_channel: String,
    roster_channel: String,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a new state and notify readers. Caller holds the lock.
    fn publish(&self, shared: &mut Shared, state: AggregatorState) {
        shared.state = state;
        self.view.send_replace(shared.state.clone());
    }

    fn apply_output(&self, event: &OutputEvent) -> EventOutcome {
        let mut shared = self.lock();
        if shared.phase == SubscriptionPhase::Unsubscribed {
            debug!(url = %event.url, "Ignoring output delivered after teardown");
            return EventOutcome::Ignored;
        }

        let transition = shared.state.on_event(event, self.clock.as_ref());
        if let Some(warning) = transition.warning {
            warn!(url = %warning.url, "Dropping output for unknown stream");
            return EventOutcome::Unmatched(warning);
        }

        debug!(url = %event.url, category = %event.kind, "Appended output line");
        self.publish(&mut shared, transition.state);
        EventOutcome::Applied
    }

    fn apply_roster(&self, update: &StreamsUpdate) -> EventOutcome {
        let mut shared = self.lock();
        if shared.phase == SubscriptionPhase::Unsubscribed {
            debug!("Ignoring roster delivered after teardown");
            return EventOutcome::Ignored;
        }

        let next = shared.state.on_streams_update(update, self.clock.as_ref());
        if next == shared.state {
            return EventOutcome::Applied;
        }

        debug!(
            streams = update.streams.len(),
            records = next.len(),
            "Applied stream roster"
        );
        self.publish(&mut shared, next);
        EventOutcome::Applied
    }

    /// Decode a delivered message by its channel and apply it.
    fn dispatch(&self, message: ChannelMessage) {
        if message.channel == self.output_channel {
            match OutputEvent::from_value(message.payload) {
                Ok(event) => {
                    self.apply_output(&event);
                }
                Err(e) => warn!(error = %e, "Skipping malformed output payload"),
            }
        } else if message.channel == self.roster_channel {
            match StreamsUpdate::from_value(message.payload) {
                Ok(update) => {
                    self.apply_roster(&update);
                }
                Err(e) => warn!(error = %e, "Skipping malformed roster payload"),
            }
        } else {
            trace!(channel = %message.channel, "Ignoring unrelated channel");
        }
    }
}

/// Subscription adapter that owns the aggregated stream state.
pub struct LiveLineAggregator {
    inner: Arc<Inner>,
    cancel: CancellationToken,
    pump: Option<JoinHandle<()>>,
}

impl LiveLineAggregator {
    /// Validate the seed, attach to `source` and start applying output and
    /// roster events in delivery order.
    ///
    /// On error nothing is subscribed and no state exists.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn initialize(
        seed: Vec<StreamRecord>,
        source: &dyn EventSource,
        settings: &Settings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AggregatorError> {
        let state = AggregatorState::initialize(seed)?;
        let (view, _) = watch::channel(state.clone());

        let inner = Arc::new(Inner {
            shared: Mutex::new(Shared {
                phase: SubscriptionPhase::Subscribed,
                state,
            }),
            view,
            clock,
            output_channel: settings.effective_output_channel().to_string(),
            roster_channel: settings.effective_roster_channel().to_string(),
        });

        let rx = source.subscribe();
        let cancel = CancellationToken::new();
        let pump = tokio::spawn(run_pump(Arc::clone(&inner), rx, cancel.clone()));

        debug!(
            output_channel = %inner.output_channel,
            roster_channel = %inner.roster_channel,
            records = inner.lock().state.len(),
            "Live line aggregator subscribed"
        );

        Ok(Self {
            inner,
            cancel,
            pump: Some(pump),
        })
    }

    /// Apply one output event directly, as if delivered on the output channel.
    pub fn on_event(&self, event: &OutputEvent) -> EventOutcome {
        self.inner.apply_output(event)
    }

    /// Apply one roster snapshot directly.
    pub fn on_streams_update(&self, update: &StreamsUpdate) -> EventOutcome {
        self.inner.apply_roster(update)
    }

    /// Current state.
    pub fn snapshot(&self) -> AggregatorState {
        self.inner.lock().state.clone()
    }

    /// Feed of states, updated after every applied event.
    pub fn watch(&self) -> watch::Receiver<AggregatorState> {
        self.inner.view.subscribe()
    }

    pub fn phase(&self) -> SubscriptionPhase {
        self.inner.lock().phase
    }

    /// Detach from the channels and stop applying events. Idempotent.
    pub fn teardown(&self) {
        let mut shared = self.inner.lock();
        if shared.phase == SubscriptionPhase::Unsubscribed {
            return;
        }
        shared.phase = SubscriptionPhase::Unsubscribed;
        self.cancel.cancel();
        debug!(
            records = shared.state.len(),
            lines = shared.state.line_count(),
            "Live line aggregator torn down"
        );
    }

    /// Wait until the pump has stopped.
    ///
    /// The pump stops after `teardown`, or once the source has closed and
    /// every queued payload has been applied.
    pub async fn closed(&mut self) {
        if let Some(pump) = self.pump.take() {
            if let Err(e) = pump.await {
                warn!(error = %e, "Aggregator pump task failed");
            }
        }
    }
}

impl Drop for LiveLineAggregator {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Receive until cancelled or the source closes.
async fn run_pump(
    inner: Arc<Inner>,
    mut rx: broadcast::Receiver<ChannelMessage>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            received = rx.recv() => match received {
                Ok(message) => inner.dispatch(message),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Receiver lagged, events were lost");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    debug!("Aggregator pump exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventHub;
    use restream_core::{FixedClock, StreamStatus};
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::timeout;

    fn start(hub: &EventHub, ids: &[&str]) -> LiveLineAggregator {
        LiveLineAggregator::initialize(
            ids.iter().map(|id| StreamRecord::new(*id)).collect(),
            hub,
            &Settings::with_defaults(),
            Arc::new(FixedClock::at_unix(1_700_000_000)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_subscribes_once() {
        let hub = EventHub::new(16);
        let aggregator = start(&hub, &["a"]);

        assert_eq!(aggregator.phase(), SubscriptionPhase::Subscribed);
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_initialize_with_duplicate_seed_subscribes_nothing() {
        let hub = EventHub::new(16);
        let result = LiveLineAggregator::initialize(
            vec![StreamRecord::new("a"), StreamRecord::new("a")],
            &hub,
            &Settings::with_defaults(),
            Arc::new(FixedClock::at_unix(0)),
        );

        assert!(matches!(result, Err(AggregatorError::DuplicateId(_))));
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_direct_events_apply_and_warn() {
        let hub = EventHub::new(16);
        let aggregator = start(&hub, &["a"]);

        assert_eq!(
            aggregator.on_event(&OutputEvent::new("a", "hello", "info")),
            EventOutcome::Applied
        );
        assert_eq!(
            aggregator.on_event(&OutputEvent::new("b", "x", "info")),
            EventOutcome::Unmatched(UnmatchedEventWarning::new("b"))
        );

        let state = aggregator.snapshot();
        assert_eq!(state.line_count(), 1);
        assert_eq!(state.get("a").unwrap().output_lines[0].text, "hello");
    }

    #[tokio::test]
    async fn test_teardown_is_idempotent_and_stops_mutation() {
        let hub = EventHub::new(16);
        let mut aggregator = start(&hub, &["a"]);

        aggregator.teardown();
        aggregator.teardown();

        assert_eq!(aggregator.phase(), SubscriptionPhase::Unsubscribed);
        assert_eq!(
            aggregator.on_event(&OutputEvent::new("a", "late", "info")),
            EventOutcome::Ignored
        );
        assert_eq!(
            aggregator.on_streams_update(&StreamsUpdate::default()),
            EventOutcome::Ignored
        );

        timeout(Duration::from_secs(2), aggregator.closed())
            .await
            .expect("pump should stop after teardown");
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(aggregator.snapshot().line_count(), 0);
    }

    #[tokio::test]
    async fn test_watch_sees_each_applied_state() {
        let hub = EventHub::new(16);
        let aggregator = start(&hub, &["a"]);
        let mut rx = aggregator.watch();
        assert_eq!(rx.borrow_and_update().line_count(), 0);

        aggregator.on_event(&OutputEvent::new("a", "one", "info"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().line_count(), 1);

        aggregator.on_event(&OutputEvent::new("nobody", "x", "info"));
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_roster_without_changes_does_not_notify() {
        let hub = EventHub::new(16);
        let aggregator = start(&hub, &[]);
        let mut rx = aggregator.watch();
        rx.borrow_and_update();

        let update = StreamsUpdate::from_value(json!({
            "streams": [{ "url": "a", "status": "running", "pid": 1 }]
        }))
        .unwrap();
        aggregator.on_streams_update(&update);
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().get("a").unwrap().status,
            StreamStatus::Running
        );

        aggregator.on_streams_update(&update);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_pump_keeps_delivery_order_across_channels() {
        let hub = EventHub::new(16);
        let mut aggregator = start(&hub, &[]);

        hub.publish(
            "streams_update",
            json!({ "streams": [{ "url": "n", "status": "running" }] }),
        );
        hub.publish("ffmpeg_output", json!({ "url": "n", "output": "frame=1" }));
        hub.publish("unrelated", json!({ "url": "n", "output": "ignored" }));
        hub.publish("ffmpeg_output", json!({ "url": "n", "output": "frame=2" }));
        hub.close();
        timeout(Duration::from_secs(2), aggregator.closed())
            .await
            .expect("pump should drain and stop");

        let state = aggregator.snapshot();
        let texts: Vec<_> = state
            .get("n")
            .unwrap()
            .output_lines
            .iter()
            .map(|line| line.text.as_str())
            .collect();
        assert_eq!(texts, ["frame=1", "frame=2"]);
    }
}
