//! Shared monitoring state: the current snapshot and its history.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error};
use vitalwatch_types::Snapshot;

use crate::alerts::{Alert, AlertAggregator};
use crate::classifier::{Assessment, Classifier};
use crate::clock::{Clock, SystemClock};
use crate::error::SimulationError;
use crate::history::SignalHistory;
use crate::simulator::SignalSimulator;
use crate::source::SnapshotSource;

#[derive(Debug)]
struct MonitorState {
    current: Arc<Snapshot>,
    history: SignalHistory,
}

/// Current measurements plus an append-only history, shared between a
/// single writer (the scheduler or a live feed) and any number of readers.
///
/// Every write takes the lock once, so a reader never sees a current
/// snapshot that has not also been appended to the history.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use vitalwatch_sdk::{ManualClock, Monitor};
///
/// let monitor = Monitor::builder()
///     .clock(Arc::new(ManualClock::new(1_000)))
///     .build();
///
/// monitor.record_current();
/// assert_eq!(monitor.history_len(), 1);
/// assert!(monitor.active_alerts().is_empty());
/// ```
#[derive(Debug)]
pub struct Monitor {
    state: RwLock<MonitorState>,
    aggregator: AlertAggregator,
    clock: Arc<dyn Clock>,
}

impl Monitor {
    /// Monitor over the reference ranges, starting from the baseline
    /// snapshot stamped with wall-clock time.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::new()
    }

    /// The current snapshot.
    pub fn current(&self) -> Arc<Snapshot> {
        self.state.read().current.clone()
    }

    pub fn classifier(&self) -> &Classifier {
        self.aggregator.classifier()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Replace the current values with `snapshot` and append it.
    ///
    /// Used for live feeds and manually edited values.
    pub fn ingest(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        let mut state = self.state.write();
        state.history.append((*snapshot).clone());
        state.current = snapshot;
        debug!("ingested snapshot, history length {}", state.history.len());
    }

    /// Append a copy of the current values stamped with the clock's time.
    pub fn record_current(&self) -> Snapshot {
        let now = self.clock.now_ms();
        let mut state = self.state.write();
        let recorded = state.current.restamped(now);
        state.history.append(recorded.clone());
        debug!("recorded current snapshot at {}", now);
        recorded
    }

    /// Advance the current snapshot by one simulator step and append it.
    ///
    /// A rejected step is logged and leaves both the current snapshot and
    /// the history untouched.
    pub fn tick(&self, simulator: &mut SignalSimulator) -> Result<Arc<Snapshot>, SimulationError> {
        let now = self.clock.now_ms();
        let mut state = self.state.write();
        let next = match simulator.step(&state.current, now) {
            Ok(next) => Arc::new(next),
            Err(e) => {
                error!("simulation tick rejected: {}", e);
                return Err(e);
            }
        };

        state.history.append((*next).clone());
        state.current = next.clone();
        debug!("simulation tick at {}, history length {}", now, state.history.len());
        Ok(next)
    }

    /// Ingest the next snapshot from `source`, if it has one.
    ///
    /// Returns `true` if a snapshot was ingested.
    pub fn poll_source(&self, source: &mut dyn SnapshotSource) -> bool {
        match source.poll() {
            Some(snapshot) => {
                self.ingest(snapshot);
                true
            }
            None => {
                if let Some(err) = source.error() {
                    debug!("source {} reported: {}", source.description(), err);
                }
                false
            }
        }
    }

    /// The last `k` history entries, oldest first.
    pub fn recent(&self, k: usize) -> Vec<Snapshot> {
        self.state.read().history.recent(k).to_vec()
    }

    pub fn history_len(&self) -> usize {
        self.state.read().history.len()
    }

    /// A copy of the full history.
    pub fn history(&self) -> SignalHistory {
        self.state.read().history.clone()
    }

    /// Critical alerts for the current snapshot.
    pub fn active_alerts(&self) -> Vec<Alert> {
        let current = self.current();
        let alerts = self.aggregator.active_alerts(&current);
        for alert in &alerts {
            debug!("alert raised: {}", alert);
        }
        alerts
    }

    /// Tiers of every kind in the current snapshot.
    pub fn assess(&self) -> Assessment {
        self.aggregator.classifier().assess(&self.current())
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`Monitor`].
#[derive(Debug, Default)]
pub struct MonitorBuilder {
    classifier: Option<Classifier>,
    clock: Option<Arc<dyn Clock>>,
    initial: Option<Snapshot>,
}

impl MonitorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier used for alerts and assessments. Defaults to the
    /// reference ranges.
    pub fn classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Time source. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Starting snapshot. Defaults to the baseline stamped with the
    /// clock's current time. Not appended to the history.
    pub fn initial(mut self, snapshot: Snapshot) -> Self {
        self.initial = Some(snapshot);
        self
    }

    pub fn build(self) -> Monitor {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let initial = self
            .initial
            .unwrap_or_else(|| Snapshot::baseline(clock.now_ms()));

        Monitor {
            state: RwLock::new(MonitorState {
                current: Arc::new(initial),
                history: SignalHistory::new(),
            }),
            aggregator: AlertAggregator::new(self.classifier.unwrap_or_default()),
            clock,
        }
    }
}
