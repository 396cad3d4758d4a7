//! # vitalwatch-sdk
//!
//! Engine for perioperative vital-sign monitoring and checklist readiness.
//!
//! The crate classifies measurements against configurable range tables,
//! keeps a history of snapshots, raises alerts for critical values, drives
//! a seedable simulation when no live feed exists, and evaluates
//! checklist completion and composite scores against readiness gates.
//!
//! ## Quick Start
//!
//! ```rust
//! use vitalwatch_sdk::{catalog, AlertAggregator, MeasurementKind, ReadinessEvaluator, Snapshot};
//!
//! let snapshot = Snapshot::builder()
//!     .timestamp_ms(0)
//!     .value(MeasurementKind::HeartRate, 38.0)
//!     .value(MeasurementKind::OxygenSaturation, 97.0)
//!     .build();
//!
//! let alerts = AlertAggregator::default().active_alerts(&snapshot);
//! assert_eq!(alerts[0].to_string(), "Heart Rate: 38 bpm (Critical)");
//!
//! let mut checklist = catalog::pre_anesthesia();
//! checklist.toggle_completion("patient-id").unwrap();
//! let result = ReadinessEvaluator::simple().evaluate(&checklist);
//! assert_eq!(result.overall.percentage(), 4);
//! ```
//!
//! ## Features
//!
//! - **Data-driven ranges**: every threshold lives in a [`RangeTable`]
//! - **Shared state**: [`Monitor`] is safe to read from any thread while
//!   one writer advances it
//! - **Deterministic simulation**: seeded [`SignalSimulator`] and an
//!   injectable [`Clock`]
//! - **Readiness gates**: simple (critical items) or scored (critical
//!   items plus a composite score threshold)

mod alerts;
pub mod catalog;
mod checklist;
mod classifier;
mod clock;
mod error;
mod history;
mod monitor;
mod readiness;
#[cfg(feature = "tokio")]
mod scheduler;
mod simulator;
mod source;

pub use alerts::{Alert, AlertAggregator};
pub use checklist::{Checklist, ItemFilter};
pub use classifier::{validate_table, Assessment, Classifier, Reading};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ChecklistError, ClassifyError, RangeTableError, SimulationError};
pub use history::SignalHistory;
pub use monitor::{Monitor, MonitorBuilder};
pub use readiness::{
    CategoryProgress, CompositeScore, DischargeState, GateBlocker, GatePolicy, GateState, PreProcedureState, Progress,
    ReadinessEvaluator, ReadinessResult,
};
#[cfg(feature = "tokio")]
pub use scheduler::{SimulationHandle, SimulationScheduler, DEFAULT_INTERVAL};
pub use simulator::{reference_profiles, DriftProfile, SignalSimulator, SimulationProfiles};
#[cfg(feature = "tokio")]
pub use source::ChannelSource;
pub use source::{SimulatedSource, SnapshotSource};

// Re-export types for convenience
pub use vitalwatch_types::{
    Band, ChecklistItem, MeasurementKind, RangeBands, RangeTable, Snapshot, SnapshotBuilder, SubScore, Tier,
    SCHEMA_VERSION,
};
