//! Cycle selection.
//!
//! Forecast runs start at 00Z, 06Z, 12Z and 18Z but appear in the archive
//! after an unpredictable delay. The clock proposes the most recent cycle
//! boundary first and walks backwards one cycle at a time.

use chrono::{DateTime, NaiveDate, Timelike, Utc};

use ultim_core::{ForecastCycle, HOURS_BETWEEN_CYCLES};

/// Index of the last cycle of the day (18Z).
const LAST_INDEX_IN_DAY: u8 = 3;

/// Computes candidate cycles from the current time.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleClock;

impl CycleClock {
    /// Create a clock.
    pub const fn new() -> Self {
        Self
    }

    /// Most recent cycle boundary at or before `now`, on the same UTC date.
    pub fn first_candidate(&self, now: DateTime<Utc>) -> ForecastCycle {
        let hour = u8::try_from(now.hour()).unwrap_or(0);
        ForecastCycle::from_day_index(now.date_naive(), hour / HOURS_BETWEEN_CYCLES)
    }

    /// The cycle immediately before `previous`.
    ///
    /// Rolls over to 18Z of the previous date when `previous` is 00Z.
    pub fn fallback(&self, previous: ForecastCycle) -> ForecastCycle {
        match previous.index_in_day() {
            0 => {
                let date = previous.reference_date();
                let yesterday = date.pred_opt().unwrap_or(NaiveDate::MIN);
                ForecastCycle::from_day_index(yesterday, LAST_INDEX_IN_DAY)
            }
            index => ForecastCycle::from_day_index(previous.reference_date(), index - 1),
        }
    }

    /// The first candidate followed by successive fallbacks, `count` in total.
    pub fn candidates(
        &self,
        now: DateTime<Utc>,
        count: u32,
    ) -> impl Iterator<Item = ForecastCycle> + use<> {
        let clock = *self;
        std::iter::successors(Some(clock.first_candidate(now)), move |prev| {
            Some(clock.fallback(*prev))
        })
        .take(count as usize)
    }
}
