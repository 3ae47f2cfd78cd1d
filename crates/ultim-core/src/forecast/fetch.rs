//! Per-file work items and their outcomes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::cycle::ForecastCycle;
use crate::acquisition::AcquisitionError;

/// One file to fetch: where it lives remotely and where it is cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSpec {
    /// Cycle the file belongs to.
    pub cycle: ForecastCycle,
    /// Hours ahead of the cycle initialization.
    pub lead_hour: u16,
    /// Cache path; owned exclusively by this spec.
    pub local_path: PathBuf,
    /// Archive URL.
    pub remote_url: String,
}

impl FetchSpec {
    /// Whether this is the analysis file used to probe the cycle.
    pub const fn is_probe(&self) -> bool {
        self.lead_hour == 0
    }
}

/// How a successful fetch was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchSource {
    /// The file was already present in the cache; no request was issued.
    CacheHit,
    /// The file was downloaded.
    Downloaded {
        /// Body size written to disk.
        bytes: u64,
        /// Attempt that succeeded (1-based).
        attempt: u32,
    },
}

/// Result of fetching one file, after retries are exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOutcome {
    /// The work item.
    pub spec: FetchSpec,
    /// How it ended.
    pub result: Result<FetchSource, AcquisitionError>,
}

impl FetchOutcome {
    /// Successful outcome.
    pub const fn success(spec: FetchSpec, source: FetchSource) -> Self {
        Self {
            spec,
            result: Ok(source),
        }
    }

    /// Failed outcome.
    pub const fn failure(spec: FetchSpec, error: AcquisitionError) -> Self {
        Self {
            spec,
            result: Err(error),
        }
    }

    /// Whether the file is on disk and usable.
    pub const fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    /// Terminal error, if any.
    pub const fn error(&self) -> Option<&AcquisitionError> {
        match &self.result {
            Ok(_) => None,
            Err(e) => Some(e),
        }
    }

    /// Whether the file was served from the cache.
    pub const fn was_cache_hit(&self) -> bool {
        matches!(self.result, Ok(FetchSource::CacheHit))
    }
}

/// Result of trying one cycle.
///
/// `succeeded` follows the probe alone; failures in the fan-out phase do not
/// invalidate the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleAttemptResult {
    /// The cycle tried.
    pub cycle: ForecastCycle,
    /// Whether the probe file was obtained.
    pub succeeded: bool,
    /// Why the cycle was not used: `CycleUnavailable` after a failed probe,
    /// `Cancelled` when the run was aborted during the attempt.
    pub error: Option<AcquisitionError>,
    /// Outcomes in completion order, probe first.
    pub fetch_outcomes: Vec<FetchOutcome>,
}

impl CycleAttemptResult {
    /// Number of files that ended up on disk.
    pub fn succeeded_count(&self) -> usize {
        self.fetch_outcomes.iter().filter(|o| o.succeeded()).count()
    }

    /// Number of files that failed terminally.
    pub fn failed_count(&self) -> usize {
        self.fetch_outcomes.len() - self.succeeded_count()
    }
}
