//! Snapshot sources feeding a [`Monitor`](crate::Monitor).
//!
//! A live device bridge pushes snapshots through a [`ChannelSource`];
//! without one, a [`SimulatedSource`] generates them.

use std::fmt::Debug;
use std::sync::Arc;

use vitalwatch_types::Snapshot;

use crate::clock::Clock;
use crate::simulator::SignalSimulator;

/// Trait for receiving measurement snapshots from some backend.
pub trait SnapshotSource: Send + Debug {
    /// Poll for the next snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// Never blocks.
    fn poll(&mut self) -> Option<Snapshot>;

    /// Human-readable description of the source.
    fn description(&self) -> &str;

    /// The error from the last poll, if any.
    fn error(&self) -> Option<&str>;
}

/// A source that receives snapshots through a tokio watch channel.
///
/// # Example
///
/// ```rust
/// use vitalwatch_sdk::{ChannelSource, Snapshot, SnapshotSource};
///
/// let (tx, mut source) = ChannelSource::create("bedside-3", Snapshot::baseline(0));
/// assert!(source.poll().is_some());
/// assert!(source.poll().is_none());
///
/// tx.send(Snapshot::baseline(5_000)).unwrap();
/// assert_eq!(source.poll().unwrap().timestamp_ms(), 5_000);
/// ```
#[cfg(feature = "tokio")]
#[derive(Debug)]
pub struct ChannelSource {
    receiver: tokio::sync::watch::Receiver<Snapshot>,
    description: String,
    initial_returned: bool,
}

#[cfg(feature = "tokio")]
impl ChannelSource {
    /// Wrap the receiving end of a watch channel.
    ///
    /// `origin` names the producer, e.g. a device address.
    pub fn new(receiver: tokio::sync::watch::Receiver<Snapshot>, origin: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", origin),
            initial_returned: false,
        }
    }

    /// Create a channel pair seeded with `initial`.
    pub fn create(origin: &str, initial: Snapshot) -> (tokio::sync::watch::Sender<Snapshot>, Self) {
        let (tx, rx) = tokio::sync::watch::channel(initial);
        (tx, Self::new(rx, origin))
    }
}

#[cfg(feature = "tokio")]
impl SnapshotSource for ChannelSource {
    fn poll(&mut self) -> Option<Snapshot> {
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }
}

/// A source that produces a new simulated snapshot on every poll.
#[derive(Debug)]
pub struct SimulatedSource {
    simulator: SignalSimulator,
    clock: Arc<dyn Clock>,
    previous: Snapshot,
    last_error: Option<String>,
}

impl SimulatedSource {
    /// Start simulating from `start`.
    pub fn new(simulator: SignalSimulator, clock: Arc<dyn Clock>, start: Snapshot) -> Self {
        Self {
            simulator,
            clock,
            previous: start,
            last_error: None,
        }
    }
}

impl SnapshotSource for SimulatedSource {
    fn poll(&mut self) -> Option<Snapshot> {
        match self.simulator.step(&self.previous, self.clock.now_ms()) {
            Ok(next) => {
                self.last_error = None;
                self.previous = next.clone();
                Some(next)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    fn description(&self) -> &str {
        "simulated"
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
