//! Progress accounting.
//!
//! The reporter is the only writer of the progress counter. Ticks arrive from
//! the coordinator in completion order and are forwarded to the host emitter.

mod reporter;

pub use reporter::{ProgressReporter, ProgressSnapshot};
