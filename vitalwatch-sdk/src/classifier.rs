//! Severity classification of measurements against a range table.

use serde::Serialize;
use tracing::warn;
use vitalwatch_types::{MeasurementKind, RangeTable, Snapshot, Tier};

use crate::error::{ClassifyError, RangeTableError};

/// Classifies measurement values into tiers.
///
/// The rule is asymmetric: a value inside the `normal` band is
/// normal, a value inside the `warning` band is a warning, and *everything
/// else* is critical, including values far outside every configured band
/// and NaN.
#[derive(Debug, Clone)]
pub struct Classifier {
    table: RangeTable,
}

impl Classifier {
    /// Create a classifier after validating the table.
    pub fn new(table: RangeTable) -> Result<Self, RangeTableError> {
        validate_table(&table)?;
        Ok(Self { table })
    }

    /// Classifier over the reference adult ranges.
    pub fn reference() -> Self {
        Self {
            table: RangeTable::reference(),
        }
    }

    /// The table in use.
    pub fn table(&self) -> &RangeTable {
        &self.table
    }

    /// Classify a value, reporting a missing table entry as an error.
    pub fn try_classify(&self, kind: MeasurementKind, value: f64) -> Result<Tier, ClassifyError> {
        let bands = self
            .table
            .get(kind)
            .ok_or(ClassifyError::UnknownMeasurementKind(kind))?;

        if bands.normal.contains(value) {
            Ok(Tier::Normal)
        } else if bands.warning.contains(value) {
            Ok(Tier::Warning)
        } else {
            Ok(Tier::Critical)
        }
    }

    /// Classify a value.
    ///
    /// A kind with no configured ranges classifies as [`Tier::Normal`]
    /// (fail-open). The gap is logged so that it can be fixed in the
    /// configuration.
    pub fn classify(&self, kind: MeasurementKind, value: f64) -> Tier {
        match self.try_classify(kind, value) {
            Ok(tier) => tier,
            Err(err) => {
                warn!("{}; treating value {} as normal", err, value);
                Tier::Normal
            }
        }
    }

    /// Combined tier of a two-component vital such as blood pressure.
    ///
    /// The result is the worse of the two component tiers, never an average.
    pub fn classify_pair(
        &self,
        first: (MeasurementKind, f64),
        second: (MeasurementKind, f64),
    ) -> Tier {
        self.classify(first.0, first.1).worst(self.classify(second.0, second.1))
    }

    /// Combined blood-pressure tier from systolic and diastolic values.
    pub fn classify_blood_pressure(&self, systolic: f64, diastolic: f64) -> Tier {
        self.classify_pair(
            (MeasurementKind::SystolicPressure, systolic),
            (MeasurementKind::DiastolicPressure, diastolic),
        )
    }

    /// Classify every value present in a snapshot.
    pub fn assess(&self, snapshot: &Snapshot) -> Assessment {
        let readings: Vec<Reading> = snapshot
            .iter()
            .map(|(kind, value)| Reading {
                kind,
                value,
                tier: self.classify(kind, value),
            })
            .collect();

        let blood_pressure = match (
            snapshot.get(MeasurementKind::SystolicPressure),
            snapshot.get(MeasurementKind::DiastolicPressure),
        ) {
            (Some(sys), Some(dia)) => Some(self.classify_blood_pressure(sys, dia)),
            (Some(sys), None) => Some(self.classify(MeasurementKind::SystolicPressure, sys)),
            (None, Some(dia)) => Some(self.classify(MeasurementKind::DiastolicPressure, dia)),
            (None, None) => None,
        };

        // Overall status is the worst of all readings
        let overall = readings.iter().map(|r| r.tier).max().unwrap_or(Tier::Normal);

        Assessment {
            timestamp_ms: snapshot.timestamp_ms(),
            readings,
            blood_pressure,
            overall,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::reference()
    }
}

/// A classified measurement value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub kind: MeasurementKind,
    pub value: f64,
    pub tier: Tier,
}

impl Reading {
    /// Value rounded for presentation.
    pub fn display_value(&self) -> String {
        format!("{:.*}", self.kind.display_precision(), self.value)
    }
}

/// Tiers of every value in one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub timestamp_ms: u64,
    /// One reading per present kind, in canonical kind order.
    pub readings: Vec<Reading>,
    /// Combined systolic/diastolic tier, if either component is present.
    pub blood_pressure: Option<Tier>,
    /// Worst tier across all readings.
    pub overall: Tier,
}

impl Assessment {
    /// Tier for a kind, if it was present.
    pub fn tier(&self, kind: MeasurementKind) -> Option<Tier> {
        self.readings.iter().find(|r| r.kind == kind).map(|r| r.tier)
    }
}

/// Check that every configured band is well formed and that the bands of
/// each kind are nested (`normal` within `warning` within `critical`).
pub fn validate_table(table: &RangeTable) -> Result<(), RangeTableError> {
    for (kind, bands) in table.iter() {
        for (name, band) in [
            ("normal", &bands.normal),
            ("warning", &bands.warning),
            ("critical", &bands.critical),
        ] {
            if !band.min.is_finite() || !band.max.is_finite() {
                return Err(RangeTableError::InvalidBand {
                    kind,
                    reason: format!("{} band has a non-finite bound", name),
                });
            }
            if band.min > band.max {
                return Err(RangeTableError::InvalidBand {
                    kind,
                    reason: format!("{} band min {} exceeds max {}", name, band.min, band.max),
                });
            }
        }

        if !bands.warning.encloses(&bands.normal) {
            return Err(RangeTableError::InvalidBand {
                kind,
                reason: "normal band is not within the warning band".to_string(),
            });
        }
        if !bands.critical.encloses(&bands.warning) {
            return Err(RangeTableError::InvalidBand {
                kind,
                reason: "warning band is not within the critical band".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitalwatch_types::{Band, RangeBands};

    #[test]
    fn test_heart_rate_tiers() {
        let classifier = Classifier::reference();
        assert_eq!(classifier.classify(MeasurementKind::HeartRate, 72.0), Tier::Normal);
        assert_eq!(classifier.classify(MeasurementKind::HeartRate, 45.0), Tier::Warning);
        assert_eq!(classifier.classify(MeasurementKind::HeartRate, 30.0), Tier::Critical);
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        let classifier = Classifier::reference();
        assert_eq!(classifier.classify(MeasurementKind::HeartRate, 60.0), Tier::Normal);
        assert_eq!(classifier.classify(MeasurementKind::HeartRate, 100.0), Tier::Normal);
        assert_eq!(classifier.classify(MeasurementKind::HeartRate, 120.0), Tier::Warning);
        assert_eq!(classifier.classify(MeasurementKind::HeartRate, 120.5), Tier::Critical);
    }

    #[test]
    fn test_critical_is_the_fallback() {
        let classifier = Classifier::reference();
        // Far outside even the critical band
        assert_eq!(classifier.classify(MeasurementKind::HeartRate, 400.0), Tier::Critical);
        assert_eq!(classifier.classify(MeasurementKind::HeartRate, -5.0), Tier::Critical);
        assert_eq!(classifier.classify(MeasurementKind::HeartRate, f64::NAN), Tier::Critical);
    }

    #[test]
    fn test_severity_is_monotonic_away_from_normal() {
        let classifier = Classifier::reference();
        for kind in MeasurementKind::ALL {
            let bands = *classifier.table().get(kind).unwrap();
            let center = (bands.normal.min + bands.normal.max) / 2.0;

            for direction in [-1.0, 1.0] {
                let mut previous = Tier::Normal;
                for step in 0..400 {
                    let value = center + direction * step as f64 * 0.25;
                    let tier = classifier.classify(kind, value);
                    assert!(tier >= previous, "{kind} at {value}: {tier:?} < {previous:?}");
                    previous = tier;
                }
            }
        }
    }

    #[test]
    fn test_unknown_kind_fails_open() {
        let table = RangeTable::reference();
        let mut table = table;
        table.remove(MeasurementKind::EndTidalCo2);
        let classifier = Classifier::new(table).unwrap();

        assert_eq!(
            classifier.try_classify(MeasurementKind::EndTidalCo2, 5.0),
            Err(ClassifyError::UnknownMeasurementKind(MeasurementKind::EndTidalCo2))
        );
        assert_eq!(classifier.classify(MeasurementKind::EndTidalCo2, 5.0), Tier::Normal);
    }

    #[test]
    fn test_blood_pressure_takes_worse_component() {
        let classifier = Classifier::reference();
        assert_eq!(classifier.classify_blood_pressure(120.0, 80.0), Tier::Normal);
        // Systolic warning, diastolic normal
        assert_eq!(classifier.classify_blood_pressure(150.0, 80.0), Tier::Warning);
        // Systolic normal, diastolic critical
        assert_eq!(classifier.classify_blood_pressure(120.0, 130.0), Tier::Critical);
        // Warning + critical is critical, not somewhere between
        assert_eq!(classifier.classify_blood_pressure(95.0, 35.0), Tier::Critical);
    }

    #[test]
    fn test_assess_snapshot() {
        let classifier = Classifier::reference();
        let snapshot = Snapshot::builder()
            .timestamp_ms(5)
            .value(MeasurementKind::HeartRate, 72.0)
            .value(MeasurementKind::SystolicPressure, 165.0)
            .value(MeasurementKind::DiastolicPressure, 80.0)
            .value(MeasurementKind::OxygenSaturation, 92.0)
            .build();

        let assessment = classifier.assess(&snapshot);
        assert_eq!(assessment.timestamp_ms, 5);
        assert_eq!(assessment.readings.len(), 4);
        assert_eq!(assessment.tier(MeasurementKind::HeartRate), Some(Tier::Normal));
        assert_eq!(assessment.tier(MeasurementKind::OxygenSaturation), Some(Tier::Warning));
        assert_eq!(assessment.tier(MeasurementKind::EndTidalCo2), None);
        assert_eq!(assessment.blood_pressure, Some(Tier::Critical));
        assert_eq!(assessment.overall, Tier::Critical);
    }

    #[test]
    fn test_assess_empty_snapshot_is_normal() {
        let classifier = Classifier::reference();
        let snapshot = Snapshot::builder().timestamp_ms(0).build();
        let assessment = classifier.assess(&snapshot);
        assert!(assessment.readings.is_empty());
        assert_eq!(assessment.blood_pressure, None);
        assert_eq!(assessment.overall, Tier::Normal);
    }

    #[test]
    fn test_reading_display_value() {
        let temp = Reading {
            kind: MeasurementKind::Temperature,
            value: 36.84,
            tier: Tier::Normal,
        };
        assert_eq!(temp.display_value(), "36.8");

        let hr = Reading {
            kind: MeasurementKind::HeartRate,
            value: 71.6,
            tier: Tier::Normal,
        };
        assert_eq!(hr.display_value(), "72");
    }

    #[test]
    fn test_validate_rejects_inverted_band() {
        let table = RangeTable::new().with(
            MeasurementKind::HeartRate,
            RangeBands::new(Band::new(100.0, 60.0), Band::new(50.0, 120.0), Band::new(40.0, 150.0)),
        );
        let err = Classifier::new(table).unwrap_err();
        assert!(err.to_string().contains("normal band min 100 exceeds max 60"));
    }

    #[test]
    fn test_validate_rejects_unnested_bands() {
        let table = RangeTable::new().with(
            MeasurementKind::RespiratoryRate,
            RangeBands::new(Band::new(12.0, 20.0), Band::new(14.0, 30.0), Band::new(6.0, 40.0)),
        );
        assert!(matches!(
            validate_table(&table),
            Err(RangeTableError::InvalidBand {
                kind: MeasurementKind::RespiratoryRate,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_bound() {
        let table = RangeTable::new().with(
            MeasurementKind::Temperature,
            RangeBands::new(
                Band::new(36.1, 37.8),
                Band::new(35.0, f64::INFINITY),
                Band::new(34.0, 40.0),
            ),
        );
        assert!(validate_table(&table).is_err());
    }
}
