//! Acquisition events - everything the host UI observes about a run.

use serde::{Deserialize, Serialize};

use crate::forecast::ForecastCycle;

/// Terminal state of an acquisition run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AcquisitionStatus {
    /// A cycle passed its probe and its fan-out drained.
    Completed {
        /// The cycle that was used.
        cycle: ForecastCycle,
    },
    /// Every candidate cycle failed its probe.
    Exhausted,
    /// The host aborted the run.
    Aborted,
}

impl AcquisitionStatus {
    /// Convert to string representation for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::Exhausted => "exhausted",
            Self::Aborted => "aborted",
        }
    }

    /// The cycle used, if the run completed.
    #[must_use]
    pub const fn cycle(&self) -> Option<ForecastCycle> {
        match self {
            Self::Completed { cycle } => Some(*cycle),
            Self::Exhausted | Self::Aborted => None,
        }
    }
}

/// Single discriminated union for all acquisition events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcquisitionEvent {
    /// The progress counter was reset.
    ///
    /// `None` means indeterminate: the progress indicator should be hidden.
    ProgressInit {
        /// Number of files expected, if known.
        total: Option<u32>,
    },

    /// One more file finished, successfully or not.
    ProgressTick {
        /// Files finished so far.
        count: u32,
        /// Files expected.
        total: u32,
    },

    /// A cycle is about to be probed.
    CycleStarted {
        /// The candidate cycle.
        cycle: ForecastCycle,
    },

    /// The probe failed and the run will fall back (or give up).
    CycleUnavailable {
        /// The cycle that failed.
        cycle: ForecastCycle,
        /// Why the probe failed.
        error: String,
    },

    /// A fan-out file failed terminally; the run continues.
    FileFailed {
        /// The cycle being fetched.
        cycle: ForecastCycle,
        /// Lead hour of the file.
        lead_hour: u16,
        /// Why it failed.
        error: String,
    },

    /// The run is over.
    AcquisitionComplete {
        /// How it ended.
        status: AcquisitionStatus,
        /// Number of slices in the aggregate handed to the host.
        slices: usize,
    },
}

impl AcquisitionEvent {
    /// Create a progress init event for a known total.
    #[must_use]
    pub const fn progress_init(total: u32) -> Self {
        Self::ProgressInit { total: Some(total) }
    }

    /// Create a progress reset event.
    #[must_use]
    pub const fn progress_reset() -> Self {
        Self::ProgressInit { total: None }
    }

    /// Create a file failed event.
    pub fn file_failed(cycle: ForecastCycle, lead_hour: u16, error: impl Into<String>) -> Self {
        Self::FileFailed {
            cycle,
            lead_hour,
            error: error.into(),
        }
    }

    /// Get the event name for wire protocols.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::ProgressInit { .. } => "acquisition:progress_init",
            Self::ProgressTick { .. } => "acquisition:progress",
            Self::CycleStarted { .. } => "acquisition:cycle_started",
            Self::CycleUnavailable { .. } => "acquisition:cycle_unavailable",
            Self::FileFailed { .. } => "acquisition:file_failed",
            Self::AcquisitionComplete { .. } => "acquisition:complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_reset_serializes_as_null_total() {
        let json = serde_json::to_value(AcquisitionEvent::progress_reset()).unwrap();
        assert_eq!(json["type"], "progress_init");
        assert!(json["total"].is_null());
    }

    #[test]
    fn test_complete_event_round_trip() {
        let cycle = ForecastCycle::new(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(), 6).unwrap();
        let event = AcquisitionEvent::AcquisitionComplete {
            status: AcquisitionStatus::Completed { cycle },
            slices: 48,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"state\":\"completed\""));

        let parsed: AcquisitionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
        assert_eq!(parsed.event_name(), "acquisition:complete");
    }

    #[test]
    fn test_status_cycle() {
        assert_eq!(AcquisitionStatus::Exhausted.cycle(), None);
        assert_eq!(AcquisitionStatus::Aborted.as_str(), "aborted");
    }
}
