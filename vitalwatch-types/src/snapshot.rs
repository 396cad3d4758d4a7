//! Snapshot - one timestamped set of simultaneous measurements.

use alloc::collections::BTreeMap;

use crate::MeasurementKind;

/// A point-in-time set of measurement values.
///
/// Kinds may be absent (for example end-tidal CO₂ when capnography is not
/// monitored). Snapshots are immutable: the only way to obtain a different
/// snapshot is to build a new one.
///
/// # Example
///
/// ```rust
/// use vitalwatch_types::{MeasurementKind, Snapshot};
///
/// let snapshot = Snapshot::builder()
///     .timestamp_ms(1_700_000_000_000)
///     .value(MeasurementKind::HeartRate, 72.0)
///     .value(MeasurementKind::Temperature, 36.8)
///     .build();
///
/// assert_eq!(snapshot.len(), 2);
/// assert!(snapshot.get(MeasurementKind::EndTidalCo2).is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Unix timestamp in milliseconds when the values were captured.
    timestamp_ms: u64,

    /// Values keyed by kind.
    values: BTreeMap<MeasurementKind, f64>,
}

impl Snapshot {
    /// Create a builder for constructing snapshots.
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new()
    }

    /// The reference resting adult baseline, stamped with `timestamp_ms`.
    pub fn baseline(timestamp_ms: u64) -> Self {
        Self::builder()
            .timestamp_ms(timestamp_ms)
            .value(MeasurementKind::HeartRate, 72.0)
            .value(MeasurementKind::SystolicPressure, 120.0)
            .value(MeasurementKind::DiastolicPressure, 80.0)
            .value(MeasurementKind::OxygenSaturation, 98.0)
            .value(MeasurementKind::Temperature, 36.8)
            .value(MeasurementKind::RespiratoryRate, 16.0)
            .value(MeasurementKind::EndTidalCo2, 40.0)
            .build()
    }

    /// Capture time in milliseconds since the Unix epoch.
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// Value for a kind, if present.
    pub fn get(&self, kind: MeasurementKind) -> Option<f64> {
        self.values.get(&kind).copied()
    }

    /// Check whether a kind is present.
    pub fn contains(&self, kind: MeasurementKind) -> bool {
        self.values.contains_key(&kind)
    }

    /// Iterate over present values in canonical kind order.
    pub fn iter(&self) -> impl Iterator<Item = (MeasurementKind, f64)> + '_ {
        self.values.iter().map(|(kind, value)| (*kind, *value))
    }

    /// Number of present kinds.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the snapshot has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A copy of this snapshot carrying a different capture time.
    pub fn restamped(&self, timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            values: self.values.clone(),
        }
    }
}

/// Builder for constructing `Snapshot` instances.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    timestamp_ms: Option<u64>,
    values: BTreeMap<MeasurementKind, f64>,
}

impl SnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a specific timestamp (milliseconds since Unix epoch).
    pub fn timestamp_ms(mut self, ts: u64) -> Self {
        self.timestamp_ms = Some(ts);
        self
    }

    /// Set the value for a kind, replacing any earlier value.
    pub fn value(mut self, kind: MeasurementKind, value: f64) -> Self {
        self.values.insert(kind, value);
        self
    }

    /// Set the value for a kind only when one is given.
    pub fn maybe_value(self, kind: MeasurementKind, value: Option<f64>) -> Self {
        match value {
            Some(v) => self.value(kind, v),
            None => self,
        }
    }

    /// Build the snapshot, stamping it with the current time if no
    /// timestamp was set.
    #[cfg(feature = "std")]
    pub fn build(self) -> Snapshot {
        Snapshot {
            timestamp_ms: self.timestamp_ms.unwrap_or_else(current_timestamp_ms),
            values: self.values,
        }
    }

    /// Build the snapshot with a specific timestamp (for no_std).
    #[cfg(not(feature = "std"))]
    pub fn build(self) -> Snapshot {
        Snapshot {
            timestamp_ms: self.timestamp_ms.unwrap_or(0),
            values: self.values,
        }
    }
}

/// Get current timestamp in milliseconds since Unix epoch.
#[cfg(feature = "std")]
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
