use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, StatsError};

/// A closed, inclusive date range spent together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

impl Interval {
    pub fn new(start: NaiveDate, end: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    /// Inclusive day count: a single-day visit is 1 day.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// One row of the interval table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntervalRecord {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
    pub duration_days: i64,
    pub gap_before_days: i64,
}

/// Builds the per-interval table.
///
/// `intervals` must already be chronological and non-overlapping; nothing is
/// sorted or checked here. The gap of each row is measured from a cursor that
/// starts at `long_distance_date` and moves to the day after each interval's
/// end. An empty list is rejected up front since every aggregate over the
/// table needs at least one row.
pub fn build_table(
    intervals: &[Interval],
    long_distance_date: NaiveDate,
) -> Result<Vec<IntervalRecord>> {
    if intervals.is_empty() {
        return Err(StatsError::EmptyDataset("time_together"));
    }

    let mut previous_end = long_distance_date;
    let table: Vec<IntervalRecord> = intervals
        .iter()
        .map(|interval| {
            let gap_before_days = (interval.start - previous_end).num_days();
            previous_end = interval.end + TimeDelta::days(1);

            IntervalRecord {
                start: interval.start,
                end: interval.end,
                label: interval.label.clone(),
                duration_days: interval.duration_days(),
                gap_before_days,
            }
        })
        .collect();

    debug!(rows = table.len(), "built interval table");
    Ok(table)
}
