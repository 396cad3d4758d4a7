//! Tiered numeric bands per measurement kind.

use alloc::collections::BTreeMap;

use crate::MeasurementKind;

/// An inclusive `[min, max]` interval.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    /// Create a new band.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check whether `value` lies within the band, bounds included.
    ///
    /// NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Check whether `other` lies entirely within this band.
    pub fn encloses(&self, other: &Band) -> bool {
        other.min >= self.min && other.max <= self.max
    }
}

/// The three nested bands configured for one measurement kind.
///
/// Only `normal` and `warning` take part in classification; anything
/// outside `warning` is critical. `critical` documents the outer edge of
/// the plausible range and bounds the simulator profiles.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeBands {
    pub normal: Band,
    pub warning: Band,
    pub critical: Band,
}

impl RangeBands {
    /// Create a set of bands.
    pub const fn new(normal: Band, warning: Band, critical: Band) -> Self {
        Self {
            normal,
            warning,
            critical,
        }
    }
}

/// Range definitions for every configured measurement kind.
///
/// A kind may be missing from the table; classification of such a kind
/// is handled by the engine (see `vitalwatch_sdk::classify`).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RangeTable {
    entries: BTreeMap<MeasurementKind, RangeBands>,
}

impl RangeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference adult perioperative ranges.
    pub fn reference() -> Self {
        Self::new()
            .with(
                MeasurementKind::HeartRate,
                RangeBands::new(Band::new(60.0, 100.0), Band::new(50.0, 120.0), Band::new(40.0, 150.0)),
            )
            .with(
                MeasurementKind::SystolicPressure,
                RangeBands::new(Band::new(100.0, 140.0), Band::new(90.0, 160.0), Band::new(70.0, 180.0)),
            )
            .with(
                MeasurementKind::DiastolicPressure,
                RangeBands::new(Band::new(60.0, 90.0), Band::new(50.0, 100.0), Band::new(40.0, 120.0)),
            )
            .with(
                MeasurementKind::OxygenSaturation,
                RangeBands::new(Band::new(95.0, 100.0), Band::new(90.0, 100.0), Band::new(85.0, 100.0)),
            )
            .with(
                MeasurementKind::Temperature,
                RangeBands::new(Band::new(36.1, 37.8), Band::new(35.0, 38.5), Band::new(34.0, 40.0)),
            )
            .with(
                MeasurementKind::RespiratoryRate,
                RangeBands::new(Band::new(12.0, 20.0), Band::new(8.0, 30.0), Band::new(6.0, 40.0)),
            )
            .with(
                MeasurementKind::EndTidalCo2,
                RangeBands::new(Band::new(35.0, 45.0), Band::new(30.0, 50.0), Band::new(20.0, 60.0)),
            )
    }

    /// Builder-style insert.
    pub fn with(mut self, kind: MeasurementKind, bands: RangeBands) -> Self {
        self.entries.insert(kind, bands);
        self
    }

    /// Insert or replace the bands for a kind.
    pub fn insert(&mut self, kind: MeasurementKind, bands: RangeBands) -> Option<RangeBands> {
        self.entries.insert(kind, bands)
    }

    /// Remove the bands for a kind.
    pub fn remove(&mut self, kind: MeasurementKind) -> Option<RangeBands> {
        self.entries.remove(&kind)
    }

    /// Look up the bands for a kind.
    pub fn get(&self, kind: MeasurementKind) -> Option<&RangeBands> {
        self.entries.get(&kind)
    }

    /// Iterate over configured kinds in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (MeasurementKind, &RangeBands)> {
        self.entries.iter().map(|(kind, bands)| (*kind, bands))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_inclusive_bounds() {
        let band = Band::new(60.0, 100.0);
        assert!(band.contains(60.0));
        assert!(band.contains(100.0));
        assert!(!band.contains(59.999));
        assert!(!band.contains(f64::NAN));
    }

    #[test]
    fn test_reference_covers_every_kind() {
        let table = RangeTable::reference();
        assert_eq!(table.len(), MeasurementKind::ALL.len());
        for kind in MeasurementKind::ALL {
            let bands = table.get(kind).unwrap();
            assert!(bands.warning.encloses(&bands.normal), "{kind}");
            assert!(bands.critical.encloses(&bands.warning), "{kind}");
        }
    }

    #[test]
    fn test_remove_entry() {
        let mut table = RangeTable::reference();
        assert!(table.remove(MeasurementKind::EndTidalCo2).is_some());
        assert!(table.get(MeasurementKind::EndTidalCo2).is_none());
        assert_eq!(table.len(), 6);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_table_keyed_by_kind() {
        let json = r#"{
            "heart_rate": {
                "normal": { "min": 60, "max": 100 },
                "warning": { "min": 50, "max": 120 },
                "critical": { "min": 40, "max": 150 }
            }
        }"#;

        let table: RangeTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.len(), 1);
        let bands = table.get(MeasurementKind::HeartRate).unwrap();
        assert_eq!(bands.warning, Band::new(50.0, 120.0));
    }
}
