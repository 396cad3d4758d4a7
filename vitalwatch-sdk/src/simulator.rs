//! Bounded random-walk generator for simulated measurements.
//!
//! Used when no live feed is available. Each step perturbs every present
//! value by a uniform draw in `[-delta, +delta]` and clamps the result to a
//! per-kind plausibility window that sits inside the critical band, so a
//! simulated patient drifts rather than alarming on every tick.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vitalwatch_types::{MeasurementKind, Snapshot};

use crate::error::SimulationError;

/// Drift parameters for one measurement kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftProfile {
    /// Maximum absolute change per step.
    pub delta: f64,
    /// Lower clamp bound.
    pub low: f64,
    /// Upper clamp bound.
    pub high: f64,
}

impl DriftProfile {
    pub const fn new(delta: f64, low: f64, high: f64) -> Self {
        Self { delta, low, high }
    }

    fn validate(&self, kind: MeasurementKind) -> Result<(), SimulationError> {
        let invalid = |reason: &str| SimulationError::InvalidProfile {
            kind,
            reason: reason.to_string(),
        };
        if !(self.delta.is_finite() && self.low.is_finite() && self.high.is_finite()) {
            return Err(invalid("bounds and delta must be finite"));
        }
        if self.delta < 0.0 {
            return Err(invalid("delta must not be negative"));
        }
        // The draw spans 2 * delta, which must stay representable
        if !(2.0 * self.delta).is_finite() {
            return Err(invalid("delta is too large"));
        }
        if self.low > self.high {
            return Err(invalid("low bound exceeds high bound"));
        }
        Ok(())
    }
}

/// Drift profiles keyed by kind.
pub type SimulationProfiles = BTreeMap<MeasurementKind, DriftProfile>;

/// The reference drift profiles.
pub fn reference_profiles() -> SimulationProfiles {
    BTreeMap::from([
        (MeasurementKind::HeartRate, DriftProfile::new(5.0, 40.0, 150.0)),
        (MeasurementKind::SystolicPressure, DriftProfile::new(4.0, 90.0, 160.0)),
        (MeasurementKind::DiastolicPressure, DriftProfile::new(3.0, 50.0, 100.0)),
        (MeasurementKind::OxygenSaturation, DriftProfile::new(1.0, 90.0, 100.0)),
        (MeasurementKind::Temperature, DriftProfile::new(0.1, 35.5, 38.0)),
        (MeasurementKind::RespiratoryRate, DriftProfile::new(2.0, 8.0, 30.0)),
        (MeasurementKind::EndTidalCo2, DriftProfile::new(2.0, 30.0, 50.0)),
    ])
}

/// Seedable snapshot generator.
///
/// Two simulators built with the same profiles and seed produce
/// bit-identical sequences from the same starting snapshot.
#[derive(Debug, Clone)]
pub struct SignalSimulator {
    profiles: SimulationProfiles,
    rng: StdRng,
}

impl SignalSimulator {
    /// Create a simulator. Without a seed the generator is seeded from
    /// system entropy.
    pub fn new(profiles: SimulationProfiles, seed: Option<u64>) -> Result<Self, SimulationError> {
        for (kind, profile) in &profiles {
            profile.validate(*kind)?;
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { profiles, rng })
    }

    /// Simulator over the reference profiles.
    pub fn reference(seed: Option<u64>) -> Self {
        Self {
            profiles: reference_profiles(),
            rng: match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            },
        }
    }

    pub fn profiles(&self) -> &SimulationProfiles {
        &self.profiles
    }

    /// Produce the next snapshot from `previous`, stamped `timestamp_ms`.
    ///
    /// Absent kinds stay absent. Present kinds without a profile are
    /// carried over unchanged. A non-finite value anywhere in `previous`
    /// rejects the whole step before any randomness is drawn.
    pub fn step(&mut self, previous: &Snapshot, timestamp_ms: u64) -> Result<Snapshot, SimulationError> {
        if let Some((kind, value)) = previous.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimulationError::NonFiniteValue { kind, value });
        }

        let mut builder = Snapshot::builder().timestamp_ms(timestamp_ms);
        for (kind, value) in previous.iter() {
            let next = match self.profiles.get(&kind) {
                Some(profile) => {
                    let jitter = self.rng.gen_range(-profile.delta..=profile.delta);
                    (value + jitter).clamp(profile.low, profile.high)
                }
                None => {
                    debug!("no drift profile for {}, holding value {}", kind, value);
                    value
                }
            };
            builder = builder.value(kind, next);
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(seed: u64, steps: usize) -> Vec<Snapshot> {
        let mut simulator = SignalSimulator::reference(Some(seed));
        let mut current = Snapshot::baseline(0);
        let mut out = Vec::new();
        for i in 0..steps {
            current = simulator.step(&current, (i as u64 + 1) * 5_000).unwrap();
            out.push(current.clone());
        }
        out
    }

    #[test]
    fn test_same_seed_is_bit_identical() {
        let a = run(42, 200);
        let b = run(42, 200);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.timestamp_ms(), y.timestamp_ms());
            for ((kx, vx), (ky, vy)) in x.iter().zip(y.iter()) {
                assert_eq!(kx, ky);
                assert_eq!(vx.to_bits(), vy.to_bits());
            }
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        assert_ne!(run(1, 5), run(2, 5));
    }

    #[test]
    fn test_values_stay_within_profile_bounds() {
        let profiles = reference_profiles();
        for snapshot in run(7, 1_000) {
            for (kind, value) in snapshot.iter() {
                let p = profiles[&kind];
                assert!(value >= p.low && value <= p.high, "{kind} = {value}");
            }
        }
    }

    #[test]
    fn test_step_moves_at_most_delta_inside_bounds() {
        let mut simulator = SignalSimulator::reference(Some(3));
        let previous = Snapshot::baseline(0);
        let next = simulator.step(&previous, 1).unwrap();
        let hr_before = previous.get(MeasurementKind::HeartRate).unwrap();
        let hr_after = next.get(MeasurementKind::HeartRate).unwrap();
        assert!((hr_after - hr_before).abs() <= 5.0);
        assert_eq!(next.timestamp_ms(), 1);
    }

    #[test]
    fn test_absent_kind_stays_absent() {
        let mut simulator = SignalSimulator::reference(Some(9));
        let previous = Snapshot::builder()
            .timestamp_ms(0)
            .value(MeasurementKind::HeartRate, 72.0)
            .build();
        let next = simulator.step(&previous, 5_000).unwrap();
        assert!(next.get(MeasurementKind::EndTidalCo2).is_none());
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn test_out_of_window_value_is_clamped_back() {
        let mut simulator = SignalSimulator::reference(Some(11));
        let previous = Snapshot::builder()
            .timestamp_ms(0)
            .value(MeasurementKind::OxygenSaturation, 70.0)
            .build();
        let next = simulator.step(&previous, 1).unwrap();
        assert_eq!(next.get(MeasurementKind::OxygenSaturation), Some(90.0));
    }

    #[test]
    fn test_kind_without_profile_is_held() {
        let mut profiles = reference_profiles();
        profiles.remove(&MeasurementKind::Temperature);
        let mut simulator = SignalSimulator::new(profiles, Some(5)).unwrap();
        let next = simulator.step(&Snapshot::baseline(0), 1).unwrap();
        assert_eq!(next.get(MeasurementKind::Temperature), Some(36.8));
    }

    #[test]
    fn test_nan_previous_is_rejected() {
        let mut simulator = SignalSimulator::reference(Some(1));
        let previous = Snapshot::builder()
            .timestamp_ms(0)
            .value(MeasurementKind::HeartRate, 72.0)
            .value(MeasurementKind::Temperature, f64::NAN)
            .build();

        let err = simulator.step(&previous, 1).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::NonFiniteValue {
                kind: MeasurementKind::Temperature,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_profile_is_rejected() {
        let profiles = BTreeMap::from([(
            MeasurementKind::HeartRate,
            DriftProfile::new(5.0, 150.0, 40.0),
        )]);
        assert!(matches!(
            SignalSimulator::new(profiles, None),
            Err(SimulationError::InvalidProfile { .. })
        ));

        let negative = BTreeMap::from([(MeasurementKind::HeartRate, DriftProfile::new(-1.0, 40.0, 150.0))]);
        assert!(SignalSimulator::new(negative, None).is_err());

        let huge = BTreeMap::from([(MeasurementKind::HeartRate, DriftProfile::new(1e308, 40.0, 150.0))]);
        assert!(matches!(
            SignalSimulator::new(huge, Some(0)),
            Err(SimulationError::InvalidProfile { reason, .. }) if reason == "delta is too large"
        ));
    }

    #[test]
    fn test_largest_accepted_delta_steps_within_bounds() {
        let delta = f64::MAX / 4.0;
        let profiles = BTreeMap::from([(MeasurementKind::HeartRate, DriftProfile::new(delta, 40.0, 150.0))]);
        let mut simulator = SignalSimulator::new(profiles, Some(0)).unwrap();
        let previous = Snapshot::builder()
            .timestamp_ms(0)
            .value(MeasurementKind::HeartRate, 72.0)
            .build();
        let next = simulator.step(&previous, 1).unwrap();
        let hr = next.get(MeasurementKind::HeartRate).unwrap();
        assert!((40.0..=150.0).contains(&hr));
    }

    #[test]
    fn test_zero_delta_holds_value() {
        let profiles = BTreeMap::from([(MeasurementKind::HeartRate, DriftProfile::new(0.0, 40.0, 150.0))]);
        let mut simulator = SignalSimulator::new(profiles, Some(0)).unwrap();
        let previous = Snapshot::builder()
            .timestamp_ms(0)
            .value(MeasurementKind::HeartRate, 72.0)
            .build();
        let next = simulator.step(&previous, 1).unwrap();
        assert_eq!(next.get(MeasurementKind::HeartRate), Some(72.0));
    }
}
