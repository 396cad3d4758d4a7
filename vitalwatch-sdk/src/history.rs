//! Append-only log of measurement snapshots.

use vitalwatch_types::{MeasurementKind, Snapshot};

/// Insertion-ordered history of snapshots.
///
/// Growth is unbounded here; retention is left to the embedding
/// application. Consumers read a bounded suffix with [`recent`].
///
/// [`recent`]: SignalHistory::recent
#[derive(Debug, Clone, Default)]
pub struct SignalHistory {
    entries: Vec<Snapshot>,
}

impl SignalHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot. Never rejects a snapshot based on its values,
    /// and keeps repeated identical snapshots as distinct entries.
    pub fn append(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot);
    }

    /// The last `k` entries in chronological order, or all of them if the
    /// history is shorter.
    pub fn recent(&self, k: usize) -> &[Snapshot] {
        let start = self.entries.len().saturating_sub(k);
        &self.entries[start..]
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    /// Rate of change (units per minute) of a kind between the two most
    /// recent entries that carry it.
    ///
    /// Returns None if there's not enough history or no time has elapsed.
    pub fn trend_per_minute(&self, kind: MeasurementKind) -> Option<f64> {
        let mut points = self
            .entries
            .iter()
            .rev()
            .filter_map(|s| s.get(kind).map(|v| (s.timestamp_ms(), v)));
        let (current_ts, current) = points.next()?;
        let (previous_ts, previous) = points.next()?;

        let elapsed_ms = current_ts.checked_sub(previous_ts)?;
        if elapsed_ms > 0 {
            Some((current - previous) / (elapsed_ms as f64 / 60_000.0))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over every entry in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(ts: u64, hr: f64) -> Snapshot {
        Snapshot::builder()
            .timestamp_ms(ts)
            .value(MeasurementKind::HeartRate, hr)
            .build()
    }

    #[test]
    fn test_recent_returns_suffix_in_order() {
        let mut history = SignalHistory::new();
        for i in 0..10 {
            history.append(snapshot(i * 1000, 70.0 + i as f64));
        }

        let recent = history.recent(3);
        let stamps: Vec<u64> = recent.iter().map(|s| s.timestamp_ms()).collect();
        assert_eq!(stamps, vec![7000, 8000, 9000]);
        assert_eq!(history.len(), 10);
    }

    #[test]
    fn test_recent_shorter_history_returns_everything() {
        let mut history = SignalHistory::new();
        history.append(snapshot(1, 70.0));
        history.append(snapshot(2, 71.0));

        let recent = history.recent(5);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].timestamp_ms(), 1);
        assert_eq!(recent[1].timestamp_ms(), 2);
    }

    #[test]
    fn test_recent_zero_and_empty() {
        let mut history = SignalHistory::new();
        assert!(history.recent(3).is_empty());
        history.append(snapshot(1, 70.0));
        assert!(history.recent(0).is_empty());
    }

    #[test]
    fn test_append_keeps_duplicates_and_extreme_values() {
        let mut history = SignalHistory::new();
        history.append(snapshot(1, 70.0));
        history.append(snapshot(1, 70.0));
        history.append(snapshot(2, 500.0));
        assert_eq!(history.len(), 3);
        assert_eq!(history.latest().unwrap().get(MeasurementKind::HeartRate), Some(500.0));
    }

    #[test]
    fn test_trend_per_minute() {
        let mut history = SignalHistory::new();
        assert!(history.trend_per_minute(MeasurementKind::HeartRate).is_none());

        history.append(snapshot(0, 70.0));
        history.append(snapshot(30_000, 75.0));
        let trend = history.trend_per_minute(MeasurementKind::HeartRate).unwrap();
        assert!((trend - 10.0).abs() < 1e-9);

        history.append(snapshot(30_000, 80.0));
        assert!(history.trend_per_minute(MeasurementKind::HeartRate).is_none());

        // Entries without the kind are skipped
        history.append(Snapshot::builder().timestamp_ms(60_000).build());
        history.append(snapshot(90_000, 77.0));
        let trend = history.trend_per_minute(MeasurementKind::HeartRate).unwrap();
        assert!((trend + 3.0).abs() < 1e-9);
    }
}
