//! Forecast domain types.
//!
//! Pure data types describing which model run to fetch and which files make
//! it up. No I/O happens here.
//!
//! # Structure
//!
//! - `cycle` - Model run identity (`ForecastCycle`)
//! - `profile` - Lead-time sets per resolution (`Resolution`, `FileSetProfile`)
//! - `fetch` - Per-file work items and outcomes (`FetchSpec`, `FetchOutcome`, `CycleAttemptResult`)

pub mod cycle;
pub mod fetch;
pub mod profile;

pub use cycle::{CYCLE_HOURS, CycleError, ForecastCycle, HOURS_BETWEEN_CYCLES};
pub use fetch::{CycleAttemptResult, FetchOutcome, FetchSource, FetchSpec};
pub use profile::{FileSetProfile, ProfileError, Resolution};
