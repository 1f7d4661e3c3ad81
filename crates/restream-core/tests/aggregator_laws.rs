//! Behavioral laws of the aggregator reducer.
//!
//! These exercise the public API only: seed validation, order
//! preservation, the unmatched no-op, and replay determinism.

use restream_core::{
    AggregatorError, AggregatorState, FixedClock, LineCategory, OutputEvent, RosterEntry,
    StreamRecord, StreamStatus, StreamsUpdate, UnmatchedEventWarning,
};
use tokio_test::{assert_err, assert_ok};

fn seed(ids: &[&str]) -> Vec<StreamRecord> {
    ids.iter().map(|id| StreamRecord::new(*id)).collect()
}

fn apply_all(state: AggregatorState, events: &[OutputEvent]) -> AggregatorState {
    let clock = FixedClock::at_unix(1_700_000_000);
    events
        .iter()
        .fold(state, |state, event| state.on_event(event, &clock).state)
}

#[test]
fn hello_scenario() {
    let state = assert_ok!(AggregatorState::initialize(seed(&["a"])));
    let clock = FixedClock::at_unix(1_700_000_000);

    let transition = state.on_event(&OutputEvent::new("a", "hello", "info"), &clock);

    let record = transition.state.get("a").unwrap();
    assert_eq!(record.output_lines.len(), 1);
    assert_eq!(record.output_lines[0].text, "hello");
    assert_eq!(record.output_lines[0].category, LineCategory::Info);
    assert!(transition.warning.is_none());
}

#[test]
fn unmatched_scenario_raises_one_warning() {
    let state = assert_ok!(AggregatorState::initialize(seed(&["a"])));
    let clock = FixedClock::at_unix(0);

    let transition = state.on_event(&OutputEvent::new("b", "x", "info"), &clock);

    assert_eq!(transition.state, state);
    assert_eq!(transition.warning, Some(UnmatchedEventWarning::new("b")));
}

#[test]
fn order_is_preserved_for_every_prefix() {
    let events: Vec<OutputEvent> = (0..25)
        .map(|i| {
            let kind = if i % 3 == 0 { "stderr" } else { "stdout" };
            OutputEvent::new("a", format!("line {i}"), kind)
        })
        .collect();

    for n in 0..=events.len() {
        let state = apply_all(
            AggregatorState::initialize(seed(&["a", "b"])).unwrap(),
            &events[..n],
        );
        let got: Vec<(&str, &LineCategory)> = state
            .get("a")
            .unwrap()
            .output_lines
            .iter()
            .map(|line| (line.text.as_str(), &line.category))
            .collect();
        let want: Vec<(&str, &LineCategory)> = events[..n]
            .iter()
            .map(|event| (event.output.as_str(), &event.kind))
            .collect();
        assert_eq!(got, want);
        assert!(state.get("b").unwrap().output_lines.is_empty());
    }
}

#[test]
fn duplicate_anywhere_in_seed_fails() {
    let cases: [&[&str]; 4] = [
        &["a", "a"],
        &["a", "b", "a"],
        &["x", "y", "z", "z"],
        &["dup", "other", "dup", "dup"],
    ];
    for ids in cases {
        let err = assert_err!(AggregatorState::initialize(seed(ids)));
        assert!(matches!(err, AggregatorError::DuplicateId(_)));
    }
}

#[test]
fn replay_is_deterministic() {
    let events = vec![
        OutputEvent::new("a", "one", "info"),
        OutputEvent::new("ghost", "dropped", "info"),
        OutputEvent::new("a", "two", "error"),
    ];

    let first = apply_all(AggregatorState::initialize(seed(&["a"])).unwrap(), &events);
    let second = apply_all(AggregatorState::initialize(seed(&["a"])).unwrap(), &events);

    assert_eq!(first, second);
    assert_eq!(first.line_count(), 2);
}

#[test]
fn roster_then_events_reach_announced_stream() {
    let clock = FixedClock::at_unix(0);
    let state = AggregatorState::initialize(Vec::new()).unwrap();

    let dropped = state.on_event(&OutputEvent::new("late", "early line", "info"), &clock);
    assert!(!dropped.is_applied());

    let announced = dropped.state.on_streams_update(
        &StreamsUpdate::new(vec![RosterEntry::new(
            "late",
            StreamStatus::Running,
            Some(99),
        )]),
        &clock,
    );
    let applied = announced.on_event(&OutputEvent::new("late", "first line", "info"), &clock);

    assert!(applied.is_applied());
    let record = applied.state.get("late").unwrap();
    assert_eq!(record.status, StreamStatus::Running);
    assert_eq!(record.output_lines.len(), 1);
    assert_eq!(record.output_lines[0].text, "first line");
}
