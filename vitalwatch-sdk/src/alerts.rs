//! Aggregation of critical measurements into an alert list.

use std::fmt;

use serde::Serialize;
use vitalwatch_types::{MeasurementKind, Snapshot, Tier};

use crate::classifier::Classifier;

/// An active critical condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Alert {
    pub kind: MeasurementKind,
    pub value: f64,
    pub tier: Tier,
}

impl fmt::Display for Alert {
    /// Renders e.g. `Heart Rate: 32 bpm (Critical)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.*} {} ({})",
            self.kind.label(),
            self.kind.display_precision(),
            self.value,
            self.kind.unit(),
            self.tier
        )
    }
}

/// Derives the active alerts for a snapshot.
///
/// Stateless: every call re-derives from the snapshot it is given, so a
/// value flapping across a band edge raises and clears on consecutive
/// calls with no debouncing.
#[derive(Debug, Clone, Default)]
pub struct AlertAggregator {
    classifier: Classifier,
}

impl AlertAggregator {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Critical entries of `snapshot`, in canonical kind order.
    ///
    /// Returns an empty list when nothing is critical.
    pub fn active_alerts(&self, snapshot: &Snapshot) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = snapshot
            .iter()
            .filter_map(|(kind, value)| {
                let tier = self.classifier.classify(kind, value);
                (tier == Tier::Critical).then_some(Alert { kind, value, tier })
            })
            .collect();

        // Snapshot iteration is already ordered by kind; keep it explicit
        alerts.sort_by_key(|a| a.kind);
        alerts
    }

    /// Check whether any value in the snapshot is critical.
    pub fn has_critical(&self, snapshot: &Snapshot) -> bool {
        snapshot
            .iter()
            .any(|(kind, value)| self.classifier.classify(kind, value) == Tier::Critical)
    }
}
