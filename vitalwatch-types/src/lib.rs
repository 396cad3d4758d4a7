//! # vitalwatch-types
//!
//! Core types for vital-sign monitoring and procedural readiness checklists.
//! This crate defines the shared vocabulary between whatever produces
//! measurements (a device bridge, a simulator, manual entry) and the engine
//! in `vitalwatch-sdk` that classifies them and evaluates checklists.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature for JSON/TOML support
//! - **Data, not policy**: Range tables and checklist definitions are values that can be
//!   loaded from configuration; nothing clinical is baked into a call site
//! - **Immutable snapshots**: A [`Snapshot`] cannot be changed once built
//!
//! ## Features
//!
//! - `std` (default): Standard library support (wall-clock timestamps)
//! - `serde`: Serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use vitalwatch_types::{MeasurementKind, RangeTable, Snapshot, Tier};
//!
//! let snapshot = Snapshot::builder()
//!     .timestamp_ms(1_700_000_000_000)
//!     .value(MeasurementKind::HeartRate, 72.0)
//!     .value(MeasurementKind::OxygenSaturation, 98.0)
//!     .build();
//!
//! let table = RangeTable::reference();
//! let bands = table.get(MeasurementKind::HeartRate).unwrap();
//! assert!(bands.normal.contains(snapshot.get(MeasurementKind::HeartRate).unwrap()));
//! assert!(Tier::Critical > Tier::Warning);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod checklist;
mod measurement;
mod range;
mod snapshot;

pub use checklist::*;
pub use measurement::*;
pub use range::*;
pub use snapshot::*;

/// Current schema version of serialized snapshots and reports.
///
/// Increment this when making breaking changes to the serialized format.
pub const SCHEMA_VERSION: u32 = 1;
