//! Layered settings: built-in defaults, an optional TOML file, then
//! `VITALWATCH_`-prefixed environment variables.
//!
//! Range and drift entries are overrides applied on top of the reference
//! tables, keyed by measurement kind (`heart_rate`, `spo2`, ...):
//!
//! ```toml
//! discharge_threshold = 10
//!
//! [ranges.heart_rate]
//! normal = { min = 55, max = 95 }
//! warning = { min = 45, max = 120 }
//! critical = { min = 35, max = 150 }
//!
//! [simulation]
//! interval_ms = 1000
//! seed = 42
//! ```
//!
//! Nested keys in the environment use `__`, e.g.
//! `VITALWATCH_SIMULATION__SEED=7`.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use vitalwatch_sdk::catalog::DEFAULT_DISCHARGE_THRESHOLD;
use vitalwatch_sdk::{
    reference_profiles, Classifier, DriftProfile, MeasurementKind, RangeBands, RangeTable, SignalSimulator,
    SimulationProfiles,
};

/// Top-level settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Range overrides keyed by measurement kind.
    pub ranges: BTreeMap<String, RangeBands>,
    /// Composite score needed for discharge.
    pub discharge_threshold: u32,
    pub simulation: SimulationSettings,
    pub history: HistorySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Tick period in milliseconds.
    pub interval_ms: u64,
    /// Fixed seed for reproducible runs.
    pub seed: Option<u64>,
    /// Drift profile overrides keyed by measurement kind.
    pub profiles: BTreeMap<String, DriftProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Number of recent snapshots shown in reports.
    pub display_window: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ranges: BTreeMap::new(),
            discharge_threshold: DEFAULT_DISCHARGE_THRESHOLD,
            simulation: SimulationSettings::default(),
            history: HistorySettings::default(),
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            seed: None,
            profiles: BTreeMap::new(),
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { display_window: 5 }
    }
}

/// Environment layer for the `VITALWATCH_` prefix.
pub fn environment() -> Environment {
    Environment::with_prefix("VITALWATCH")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load from an optional file plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    /// Load from an optional file plus the given environment layer, then
    /// validate.
    pub fn load_with(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(env)
            .build()
            .context("failed to read configuration")?;

        let settings: Settings = config
            .try_deserialize()
            .context("failed to parse configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that every override names a known kind and that the merged
    /// tables are well-formed.
    pub fn validate(&self) -> Result<()> {
        self.classifier()?;
        SignalSimulator::new(self.profiles()?, Some(0))?;
        if self.simulation.interval_ms == 0 {
            return Err(anyhow!("simulation.interval_ms must be greater than zero"));
        }
        Ok(())
    }

    /// The reference range table with overrides applied.
    pub fn range_table(&self) -> Result<RangeTable> {
        let mut table = RangeTable::reference();
        for (key, bands) in &self.ranges {
            table.insert(parse_kind(key, "ranges")?, *bands);
        }
        Ok(table)
    }

    /// A validated classifier over [`range_table`](Self::range_table).
    pub fn classifier(&self) -> Result<Classifier> {
        Ok(Classifier::new(self.range_table()?)?)
    }

    /// The reference drift profiles with overrides applied.
    pub fn profiles(&self) -> Result<SimulationProfiles> {
        let mut profiles = reference_profiles();
        for (key, profile) in &self.simulation.profiles {
            profiles.insert(parse_kind(key, "simulation.profiles")?, *profile);
        }
        Ok(profiles)
    }

    /// A simulator seeded from `seed`, falling back to the configured seed.
    pub fn simulator(&self, seed: Option<u64>) -> Result<SignalSimulator> {
        Ok(SignalSimulator::new(self.profiles()?, seed.or(self.simulation.seed))?)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.simulation.interval_ms)
    }
}

fn parse_kind(key: &str, section: &str) -> Result<MeasurementKind> {
    key.parse()
        .map_err(|e| anyhow!("{} in [{}]", e, section))
}
