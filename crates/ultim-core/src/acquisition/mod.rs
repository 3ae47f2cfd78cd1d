//! Acquisition run types: errors, host-facing events and the final outcome.
//!
//! # Structure
//!
//! - `errors` - Error taxonomy for per-file and per-run failures
//! - `events` - Events emitted to the host (`AcquisitionEvent`, `AcquisitionStatus`)
//! - `outcome` - The artifact returned by a run (`AcquisitionOutcome`)

pub mod errors;
pub mod events;
pub mod outcome;

pub use errors::{AcquisitionError, AcquisitionResult};
pub use events::{AcquisitionEvent, AcquisitionStatus};
pub use outcome::AcquisitionOutcome;
