//! Forecast cycle identity.

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hours of the day at which the model is initialized.
pub const CYCLE_HOURS: [u8; 4] = [0, 6, 12, 18];

/// Hours between two consecutive cycles.
pub const HOURS_BETWEEN_CYCLES: u8 = 6;

const CYCLES_PER_DAY: u8 = 4;

/// Errors constructing a [`ForecastCycle`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CycleError {
    /// The hour is not one of the model initialization hours.
    #[error("invalid cycle hour {0}: expected one of 0, 6, 12, 18")]
    InvalidHour(u8),
}

/// A single model run, identified by its reference date and cycle hour.
///
/// Ordering is chronological: the date is compared first, then the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawForecastCycle")]
pub struct ForecastCycle {
    reference_date: NaiveDate,
    cycle_hour: u8,
}

/// Wire shape of [`ForecastCycle`], validated through `ForecastCycle::new`.
#[derive(Deserialize)]
struct RawForecastCycle {
    reference_date: NaiveDate,
    cycle_hour: u8,
}

impl TryFrom<RawForecastCycle> for ForecastCycle {
    type Error = CycleError;

    fn try_from(raw: RawForecastCycle) -> Result<Self, Self::Error> {
        Self::new(raw.reference_date, raw.cycle_hour)
    }
}

impl ForecastCycle {
    /// Create a cycle, validating the hour.
    pub fn new(reference_date: NaiveDate, cycle_hour: u8) -> Result<Self, CycleError> {
        if CYCLE_HOURS.contains(&cycle_hour) {
            Ok(Self {
                reference_date,
                cycle_hour,
            })
        } else {
            Err(CycleError::InvalidHour(cycle_hour))
        }
    }

    /// Create the cycle at position `index` within the day.
    ///
    /// `index` is taken modulo the number of cycles per day, so 0 is 00Z and
    /// 3 is 18Z.
    pub const fn from_day_index(reference_date: NaiveDate, index: u8) -> Self {
        Self {
            reference_date,
            cycle_hour: (index % CYCLES_PER_DAY) * HOURS_BETWEEN_CYCLES,
        }
    }

    /// Calendar date of the run.
    pub const fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Initialization hour (0, 6, 12 or 18).
    pub const fn cycle_hour(&self) -> u8 {
        self.cycle_hour
    }

    /// Index of the cycle hour within the day (0..=3).
    pub const fn index_in_day(&self) -> u8 {
        self.cycle_hour / HOURS_BETWEEN_CYCLES
    }

    /// Model initialization instant.
    pub fn init_time(&self) -> DateTime<Utc> {
        let naive = self
            .reference_date
            .and_hms_opt(u32::from(self.cycle_hour), 0, 0)
            .unwrap_or_else(|| self.reference_date.and_time(chrono::NaiveTime::MIN));
        Utc.from_utc_datetime(&naive)
    }

    /// Date formatted for archive paths (`YYYYMMDD`).
    pub fn date_stamp(&self) -> String {
        self.reference_date.format("%Y%m%d").to_string()
    }

    /// Two-digit cycle hour (`00`, `06`, `12`, `18`).
    pub fn hour_stamp(&self) -> String {
        format!("{:02}", self.cycle_hour)
    }
}

impl fmt::Display for ForecastCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02}Z", self.reference_date, self.cycle_hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_off_schedule_hours() {
        assert_eq!(
            ForecastCycle::new(date(2024, 3, 1), 7),
            Err(CycleError::InvalidHour(7))
        );
        assert!(ForecastCycle::new(date(2024, 3, 1), 18).is_ok());
    }

    #[test]
    fn stamps_are_zero_padded() {
        let cycle = ForecastCycle::new(date(2024, 3, 1), 6).unwrap();
        assert_eq!(cycle.date_stamp(), "20240301");
        assert_eq!(cycle.hour_stamp(), "06");
        assert_eq!(cycle.to_string(), "2024-03-01 06Z");
    }

    #[test]
    fn init_time_matches_date_and_hour() {
        let cycle = ForecastCycle::new(date(2024, 3, 1), 12).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(cycle.init_time(), expected);
    }

    #[test]
    fn day_index_wraps() {
        let day = date(2024, 3, 1);
        assert_eq!(ForecastCycle::from_day_index(day, 0).cycle_hour(), 0);
        assert_eq!(ForecastCycle::from_day_index(day, 3).cycle_hour(), 18);
        assert_eq!(ForecastCycle::from_day_index(day, 5).cycle_hour(), 6);
        assert_eq!(ForecastCycle::from_day_index(day, 3).index_in_day(), 3);
    }

    #[test]
    fn deserialization_validates_hour() {
        let cycle: ForecastCycle =
            serde_json::from_str(r#"{"reference_date":"2024-03-01","cycle_hour":6}"#).unwrap();
        assert_eq!(cycle, ForecastCycle::new(date(2024, 3, 1), 6).unwrap());

        let err = serde_json::from_str::<ForecastCycle>(
            r#"{"reference_date":"2024-03-01","cycle_hour":7}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid cycle hour 7"));
    }

    #[test]
    fn ordering_is_chronological() {
        let late_yesterday = ForecastCycle::new(date(2024, 2, 29), 18).unwrap();
        let early_today = ForecastCycle::new(date(2024, 3, 1), 0).unwrap();
        assert!(late_yesterday < early_today);
    }
}
