//! Measurement kinds and severity tiers.

use core::fmt;
use core::str::FromStr;

/// A physiological measurement tracked by the monitor.
///
/// The declaration order is the canonical presentation order: alerts and
/// assessments are always reported in this order regardless of how a
/// snapshot was assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MeasurementKind {
    HeartRate,
    SystolicPressure,
    DiastolicPressure,
    OxygenSaturation,
    Temperature,
    RespiratoryRate,
    EndTidalCo2,
}

impl MeasurementKind {
    /// Every kind, in canonical order.
    pub const ALL: [MeasurementKind; 7] = [
        MeasurementKind::HeartRate,
        MeasurementKind::SystolicPressure,
        MeasurementKind::DiastolicPressure,
        MeasurementKind::OxygenSaturation,
        MeasurementKind::Temperature,
        MeasurementKind::RespiratoryRate,
        MeasurementKind::EndTidalCo2,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            MeasurementKind::HeartRate => "Heart Rate",
            MeasurementKind::SystolicPressure => "Systolic BP",
            MeasurementKind::DiastolicPressure => "Diastolic BP",
            MeasurementKind::OxygenSaturation => "SpO₂",
            MeasurementKind::Temperature => "Temperature",
            MeasurementKind::RespiratoryRate => "Respiratory Rate",
            MeasurementKind::EndTidalCo2 => "ETCO₂",
        }
    }

    /// Display unit.
    pub fn unit(&self) -> &'static str {
        match self {
            MeasurementKind::HeartRate | MeasurementKind::RespiratoryRate => "bpm",
            MeasurementKind::SystolicPressure
            | MeasurementKind::DiastolicPressure
            | MeasurementKind::EndTidalCo2 => "mmHg",
            MeasurementKind::OxygenSaturation => "%",
            MeasurementKind::Temperature => "°C",
        }
    }

    /// Number of decimal places shown when presenting a value.
    pub fn display_precision(&self) -> usize {
        match self {
            MeasurementKind::Temperature => 1,
            _ => 0,
        }
    }

    /// Short machine identifier, as used in configuration keys.
    pub fn key(&self) -> &'static str {
        match self {
            MeasurementKind::HeartRate => "heart_rate",
            MeasurementKind::SystolicPressure => "systolic_pressure",
            MeasurementKind::DiastolicPressure => "diastolic_pressure",
            MeasurementKind::OxygenSaturation => "oxygen_saturation",
            MeasurementKind::Temperature => "temperature",
            MeasurementKind::RespiratoryRate => "respiratory_rate",
            MeasurementKind::EndTidalCo2 => "end_tidal_co2",
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when parsing an unrecognised measurement kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError(pub alloc::string::String);

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown measurement kind: {}", self.0)
    }
}

impl FromStr for MeasurementKind {
    type Err = ParseKindError;

    /// Accepts the configuration key plus the common clinical abbreviations.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let kind = match lowered.as_str() {
            "heart_rate" | "hr" => MeasurementKind::HeartRate,
            "systolic_pressure" | "sbp" | "systolic" => MeasurementKind::SystolicPressure,
            "diastolic_pressure" | "dbp" | "diastolic" => MeasurementKind::DiastolicPressure,
            "oxygen_saturation" | "spo2" => MeasurementKind::OxygenSaturation,
            "temperature" | "temp" => MeasurementKind::Temperature,
            "respiratory_rate" | "rr" => MeasurementKind::RespiratoryRate,
            "end_tidal_co2" | "etco2" => MeasurementKind::EndTidalCo2,
            _ => return Err(ParseKindError(s.into())),
        };
        Ok(kind)
    }
}

/// Severity tier of a classified measurement.
///
/// Ordered so that `max()` over a set of tiers yields the worst one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Tier {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl Tier {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Tier::Normal => "OK",
            Tier::Warning => "WARN",
            Tier::Critical => "CRIT",
        }
    }

    /// The worse of two tiers.
    pub fn worst(self, other: Tier) -> Tier {
        self.max(other)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Normal => "Normal",
            Tier::Warning => "Warning",
            Tier::Critical => "Critical",
        };
        f.write_str(name)
    }
}
