//! Error types for the engine.
//!
//! None of these are fatal to the process; each is a local, recoverable
//! condition handed back to the calling layer.

use thiserror::Error;
use vitalwatch_types::MeasurementKind;

use crate::readiness::GateState;

/// Errors from classifying a measurement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The range table has no entry for this kind.
    #[error("no range configured for measurement kind {0}")]
    UnknownMeasurementKind(MeasurementKind),
}

/// Errors from validating a range table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeTableError {
    /// A band is malformed or the bands are not nested.
    #[error("invalid band for {kind}: {reason}")]
    InvalidBand {
        kind: MeasurementKind,
        reason: String,
    },
}

/// Errors from building or mutating a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChecklistError {
    /// No item has this identifier. The checklist is left untouched.
    #[error("unknown checklist item: {0}")]
    UnknownItemId(String),

    /// The item exists but has no sub-score with this name.
    #[error("item {item} has no sub-score named {score}")]
    UnknownSubScore { item: String, score: String },

    /// A sub-score value outside `0..=max`. The prior value is retained.
    #[error("invalid value {value} for {item}/{score}: must be between 0 and {max}")]
    InvalidScoreValue {
        item: String,
        score: String,
        value: u32,
        max: u32,
    },

    /// Two items share an identifier.
    #[error("duplicate checklist item id: {0}")]
    DuplicateItemId(String),

    /// Submission attempted while the readiness gate is closed.
    #[error("readiness gate is closed ({0:?})")]
    GateClosed(GateState),

    /// Item definitions could not be parsed.
    #[error("failed to parse checklist definition: {0}")]
    Parse(String),
}

/// Errors from a simulator step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The previous snapshot carried a NaN or infinite value.
    #[error("non-finite value {value} for {kind} in previous snapshot")]
    NonFiniteValue { kind: MeasurementKind, value: f64 },

    /// A drift profile is malformed.
    #[error("invalid simulation profile for {kind}: {reason}")]
    InvalidProfile {
        kind: MeasurementKind,
        reason: String,
    },

    /// A scheduler was given a zero tick period.
    #[error("simulation interval must be greater than zero")]
    ZeroInterval,
}

impl From<serde_json::Error> for ChecklistError {
    fn from(err: serde_json::Error) -> Self {
        ChecklistError::Parse(err.to_string())
    }
}
