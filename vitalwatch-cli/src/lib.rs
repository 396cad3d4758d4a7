//! # vitalwatch-cli
//!
//! Command-line front end for the vitalwatch engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐    ┌───────────┐    ┌─────────────────────────┐
//! │  config  │───▶│  session  │───▶│ report (text and JSON)  │
//! │(settings)│    │(simulate, │    └─────────────────────────┘
//! └──────────┘    │ checklist)│
//!                 └─────┬─────┘
//!                       ▼
//!                 vitalwatch-sdk
//! ```
//!
//! - **[`config`]**: layered [`Settings`] from defaults, a TOML file and
//!   `VITALWATCH_` environment variables
//! - **[`session`]**: live and replayed simulations, checklist commands
//! - **[`report`]**: history tables, readiness summaries and the JSON export

pub mod config;
pub mod report;
pub mod session;

pub use config::Settings;
pub use session::ScoreUpdate;
