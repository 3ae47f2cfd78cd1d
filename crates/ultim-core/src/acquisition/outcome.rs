//! What an acquisition run hands back to the host.

use crate::dataset::AggregateDataset;
use crate::forecast::{CycleAttemptResult, ForecastCycle};

use super::errors::AcquisitionError;
use super::events::AcquisitionStatus;

/// Terminal artifact of one acquisition run.
///
/// Both failure states still carry whatever was merged before the run ended.
#[derive(Debug)]
pub struct AcquisitionOutcome<S> {
    /// How the run ended.
    pub status: AcquisitionStatus,
    /// Every cycle tried, oldest attempt first.
    pub attempts: Vec<CycleAttemptResult>,
    /// Merged slices, sorted by valid time.
    pub dataset: AggregateDataset<S>,
}

impl<S> AcquisitionOutcome<S> {
    /// Whether a cycle was obtained.
    pub const fn is_completed(&self) -> bool {
        matches!(self.status, AcquisitionStatus::Completed { .. })
    }

    /// Number of cycles tried.
    pub fn cycles_tried(&self) -> usize {
        self.attempts.len()
    }

    /// Convert into a `Result`, dropping the partial dataset on failure.
    pub fn into_result(self) -> Result<(ForecastCycle, AggregateDataset<S>), AcquisitionError> {
        match self.status {
            AcquisitionStatus::Completed { cycle } => Ok((cycle, self.dataset)),
            AcquisitionStatus::Exhausted => Err(AcquisitionError::AcquisitionExhausted {
                attempts: u32::try_from(self.attempts.len()).unwrap_or(u32::MAX),
            }),
            AcquisitionStatus::Aborted => Err(AcquisitionError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn cycle(hour: u8) -> ForecastCycle {
        ForecastCycle::new(NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(), hour).unwrap()
    }

    fn failed_attempt(hour: u8) -> CycleAttemptResult {
        CycleAttemptResult {
            cycle: cycle(hour),
            succeeded: false,
            error: Some(AcquisitionError::CycleUnavailable { cycle: cycle(hour) }),
            fetch_outcomes: vec![],
        }
    }

    #[test]
    fn exhausted_maps_to_error_with_attempt_count() {
        let outcome: AcquisitionOutcome<()> = AcquisitionOutcome {
            status: AcquisitionStatus::Exhausted,
            attempts: vec![failed_attempt(18), failed_attempt(12)],
            dataset: AggregateDataset::default(),
        };
        assert!(!outcome.is_completed());
        assert_eq!(
            outcome.into_result().unwrap_err(),
            AcquisitionError::AcquisitionExhausted { attempts: 2 }
        );
    }

    #[test]
    fn aborted_maps_to_cancelled() {
        let outcome: AcquisitionOutcome<()> = AcquisitionOutcome {
            status: AcquisitionStatus::Aborted,
            attempts: vec![],
            dataset: AggregateDataset::default(),
        };
        assert_eq!(outcome.into_result().unwrap_err(), AcquisitionError::Cancelled);
    }

    #[test]
    fn completed_yields_cycle() {
        let outcome: AcquisitionOutcome<()> = AcquisitionOutcome {
            status: AcquisitionStatus::Completed { cycle: cycle(6) },
            attempts: vec![],
            dataset: AggregateDataset::default(),
        };
        let (got, data) = outcome.into_result().unwrap();
        assert_eq!(got, cycle(6));
        assert!(data.is_empty());
    }
}
