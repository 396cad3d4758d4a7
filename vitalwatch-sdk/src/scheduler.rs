//! Periodic simulation driver.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};
use vitalwatch_types::Snapshot;

use crate::error::SimulationError;
use crate::monitor::Monitor;
use crate::simulator::SignalSimulator;
use crate::source::ChannelSource;

/// Default tick period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Runs simulator steps against a [`Monitor`] on a fixed period.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use vitalwatch_sdk::{Monitor, SignalSimulator, SimulationScheduler};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let monitor = Arc::new(Monitor::new());
///     let handle = SimulationScheduler::new(monitor.clone())
///         .interval(Duration::from_secs(5))
///         .start(SignalSimulator::reference(None))?;
///
///     tokio::time::sleep(Duration::from_secs(30)).await;
///     handle.stop().await;
///     println!("{} snapshots recorded", monitor.history_len());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct SimulationScheduler {
    monitor: Arc<Monitor>,
    interval: Duration,
    max_ticks: Option<usize>,
}

impl SimulationScheduler {
    pub fn new(monitor: Arc<Monitor>) -> Self {
        Self {
            monitor,
            interval: DEFAULT_INTERVAL,
            max_ticks: None,
        }
    }

    /// Set the tick period. Defaults to 5 seconds. A zero period is
    /// rejected by [`start`](Self::start).
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// End the loop on its own after `ticks` snapshots have been recorded.
    /// Rejected ticks do not count.
    pub fn max_ticks(mut self, ticks: usize) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    /// Spawn the tick loop. The first tick fires one full period after
    /// start.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self, simulator: SignalSimulator) -> Result<SimulationHandle, SimulationError> {
        if self.interval.is_zero() {
            return Err(SimulationError::ZeroInterval);
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let (update_tx, update_rx) = watch::channel((*self.monitor.current()).clone());
        let monitor = self.monitor;
        let period = self.interval;
        let max_ticks = self.max_ticks;

        info!("starting simulation every {:?}", period);

        let task = tokio::spawn(async move {
            let mut simulator = simulator;
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut recorded = 0;

            loop {
                if max_ticks.is_some_and(|limit| recorded >= limit) {
                    break;
                }

                tokio::select! {
                    _ = timer.tick() => {
                        match monitor.tick(&mut simulator) {
                            Ok(next) => {
                                recorded += 1;
                                let _ = update_tx.send((*next).clone());
                            }
                            Err(e) => warn!("skipping simulation tick: {}", e),
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("simulation stopped");
        });

        Ok(SimulationHandle {
            stop_tx,
            updates: update_rx,
            task,
        })
    }
}

/// Handle for a running simulation.
///
/// Dropping the handle also stops the loop, but only [`stop`] waits for
/// the task to finish.
///
/// [`stop`]: SimulationHandle::stop
#[derive(Debug)]
pub struct SimulationHandle {
    stop_tx: watch::Sender<bool>,
    updates: watch::Receiver<Snapshot>,
    task: JoinHandle<()>,
}

impl SimulationHandle {
    /// Receiver that sees the latest snapshot produced by the loop.
    ///
    /// Updates coalesce: a slow reader only sees the newest value. Read
    /// [`Monitor::history`] to visit every tick.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.updates.clone()
    }

    /// A [`ChannelSource`] fed by this simulation.
    pub fn source(&self) -> ChannelSource {
        ChannelSource::new(self.subscribe(), "simulation")
    }

    /// Stop the loop and wait for it to exit. No tick runs after this
    /// returns.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            warn!("simulation task ended abnormally: {}", e);
        }
    }
}
