//! Time-ordered forecast dataset.

use chrono::{DateTime, Utc};

/// A decoded piece of forecast data with a position on the time axis.
pub trait TimeIndexed {
    /// Instant the slice is valid for.
    fn valid_time(&self) -> DateTime<Utc>;
}

/// Accumulator of decoded slices, always sorted along the time axis.
///
/// Slices arrive in completion order, so `merge` inserts by valid time
/// rather than appending. Slices with equal valid times are kept in the
/// order they were merged.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateDataset<S> {
    slices: Vec<S>,
}

impl<S> Default for AggregateDataset<S> {
    fn default() -> Self {
        Self { slices: Vec::new() }
    }
}

impl<S: TimeIndexed> AggregateDataset<S> {
    /// Create an empty dataset.
    pub const fn new() -> Self {
        Self { slices: Vec::new() }
    }

    /// Fold a slice into the dataset along the time dimension.
    pub fn merge(&mut self, slice: S) {
        let at = slice.valid_time();
        let idx = self.slices.partition_point(|s| s.valid_time() <= at);
        self.slices.insert(idx, slice);
    }

    /// Valid times in ascending order.
    pub fn valid_times(&self) -> Vec<DateTime<Utc>> {
        self.slices.iter().map(TimeIndexed::valid_time).collect()
    }

    /// First and last valid time, if any.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.slices.first()?.valid_time();
        let last = self.slices.last()?.valid_time();
        Some((first, last))
    }

    /// The slice valid at exactly `at`, if present.
    pub fn slice_at(&self, at: DateTime<Utc>) -> Option<&S> {
        let idx = self.slices.partition_point(|s| s.valid_time() < at);
        self.slices.get(idx).filter(|s| s.valid_time() == at)
    }
}

impl<S> AggregateDataset<S> {
    /// Number of merged slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Whether nothing has been merged.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Slices in time order.
    pub fn slices(&self) -> &[S] {
        &self.slices
    }

    /// Consume into the ordered slices.
    pub fn into_slices(self) -> Vec<S> {
        self.slices
    }
}
