//! Pure state transitions for the live line aggregator.
//!
//! `AggregatorState` is an immutable value. Every transition returns a new
//! state and leaves the previous one untouched, so any state a reader holds
//! stays valid and the whole history can be replayed from the seed and the
//! event sequence.
//!
//! Records are held behind `Arc`: a transition clones only the record it
//! changes and shares every other record with the previous state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::ser::{Serialize, SerializeSeq, Serializer};
use tracing::debug;

use crate::domain::{LogLine, StreamRecord, StreamStatus};
use crate::error::{AggregatorError, UnmatchedEventWarning};
use crate::events::{OutputEvent, StreamsUpdate};
use crate::ports::Clock;

/// Ordered collection of stream records with their logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatorState {
    records: Vec<Arc<StreamRecord>>,
    /// Record id -> position in `records`. Positions never change since
    /// records are only ever appended.
    index: Arc<HashMap<String, usize>>,
}

/// Result of applying one output event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The state after the event.
    pub state: AggregatorState,
    /// Set when the event matched no record and was dropped.
    pub warning: Option<UnmatchedEventWarning>,
}

impl Transition {
    /// Whether the event was appended to a record.
    pub const fn is_applied(&self) -> bool {
        self.warning.is_none()
    }
}

impl AggregatorState {
    /// Build the initial collection from seed records, keeping their order.
    ///
    /// Fails without producing any state if an id is empty or appears twice.
    pub fn initialize(
        seed: impl IntoIterator<Item = StreamRecord>,
    ) -> Result<Self, AggregatorError> {
        let mut records = Vec::new();
        let mut index = HashMap::new();

        for record in seed {
            if record.id.is_empty() {
                return Err(AggregatorError::EmptyId);
            }
            if index.contains_key(&record.id) {
                return Err(AggregatorError::DuplicateId(record.id));
            }
            index.insert(record.id.clone(), records.len());
            records.push(Arc::new(record));
        }

        Ok(Self {
            records,
            index: Arc::new(index),
        })
    }

    /// Apply one output event.
    ///
    /// Appends `{ text, category, observed_at: clock.now() }` to the record
    /// whose id equals `event.url`. An event for an unknown id returns the
    /// current state unchanged together with an [`UnmatchedEventWarning`].
    #[must_use]
    pub fn on_event(&self, event: &OutputEvent, clock: &dyn Clock) -> Transition {
        let Some(&position) = self.index.get(&event.url) else {
            return Transition {
                state: self.clone(),
                warning: Some(UnmatchedEventWarning::new(event.url.clone())),
            };
        };

        let mut records = self.records.clone();
        // Copy-on-write: `self` still holds the Arc, so this clones the record.
        let record = Arc::make_mut(&mut records[position]);
        record.output_lines.push(LogLine::new(
            event.output.clone(),
            event.kind.clone(),
            clock.now(),
        ));

        Transition {
            state: Self {
                records,
                index: Arc::clone(&self.index),
            },
            warning: None,
        }
    }

    /// Reconcile the collection against a backend roster.
    ///
    /// - ids not yet known are appended, with the roster's backlog as log
    /// - known ids keep their log and take the roster's status and pid
    /// - known ids missing from the roster are marked stopped
    ///
    /// Records are never removed, and existing logs are never touched.
    #[must_use]
    pub fn on_streams_update(&self, update: &StreamsUpdate, clock: &dyn Clock) -> Self {
        let mut records = self.records.clone();
        let mut index = Arc::clone(&self.index);
        let mut listed: HashSet<&str> = HashSet::with_capacity(update.streams.len());

        for entry in &update.streams {
            if entry.url.is_empty() {
                debug!("Skipping roster entry without url");
                continue;
            }
            listed.insert(entry.url.as_str());

            if let Some(&position) = index.get(&entry.url) {
                let current = &records[position];
                if current.status != entry.status || current.pid != entry.pid {
                    let record = Arc::make_mut(&mut records[position]);
                    record.status = entry.status;
                    record.pid = entry.pid;
                }
                continue;
            }

            let now = clock.now();
            let backlog = entry
                .output
                .iter()
                .flatten()
                .cloned()
                .map(|line| line.into_log_line(now))
                .collect();

            debug!(url = %entry.url, status = entry.status.as_str(), "Registering stream from roster");
            Arc::make_mut(&mut index).insert(entry.url.clone(), records.len());
            records.push(Arc::new(
                StreamRecord::new(entry.url.clone())
                    .with_status(entry.status)
                    .with_pid(entry.pid)
                    .with_lines(backlog),
            ));
        }

        for record in &mut records {
            if record.status != StreamStatus::Stopped && !listed.contains(record.id.as_str()) {
                Arc::make_mut(record).status = StreamStatus::Stopped;
            }
        }

        Self { records, index }
    }

    /// Records in collection order.
    pub fn records(&self) -> impl ExactSizeIterator<Item = &StreamRecord> + '_ {
        self.records.iter().map(|record| &**record)
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&StreamRecord> {
        self.index.get(id).map(|&position| &*self.records[position])
    }

    /// Whether a record with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of lines across all records.
    pub fn line_count(&self) -> usize {
        self.records.iter().map(|r| r.output_lines.len()).sum()
    }

    /// Owned copy of every record, in order.
    pub fn to_records(&self) -> Vec<StreamRecord> {
        self.records().cloned().collect()
    }
}

impl Serialize for AggregatorState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in self.records() {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}
