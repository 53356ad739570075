//! Per-day pending/completed counts over a date range.
//!
//! Days are UTC calendar dates: a timestamp belongs to the day its UTC
//! rendering falls on.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::error::{Result, TodoError};
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    /// Tasks existing at the end of `date` and not yet completed.
    pub pending: usize,
    /// Tasks completed on `date`.
    pub completed: usize,
}

fn day(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// One point per day from `start` to `end` inclusive, ascending.
/// An inverted range yields no points.
pub fn compute_timeline(tasks: &[Task], start: NaiveDate, end: NaiveDate) -> Vec<TimelinePoint> {
    let spans: Vec<(NaiveDate, Option<NaiveDate>)> = tasks
        .iter()
        .map(|t| (day(t.created_at), t.completed_at().map(day)))
        .collect();

    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| {
            let pending = spans
                .iter()
                .filter(|(created, done)| *created <= date && done.map_or(true, |d| d > date))
                .count();
            let completed = spans.iter().filter(|(_, done)| *done == Some(date)).count();
            TimelinePoint { date, pending, completed }
        })
        .collect()
}

/// First day of a `days`-long window ending at `end`, or `None` when it
/// falls before the earliest representable date. A zero-length window is
/// treated as one day.
pub fn window_start(end: NaiveDate, days: u32) -> Option<NaiveDate> {
    end.checked_sub_days(Days::new(u64::from(days.max(1)) - 1))
}

/// The last `days` calendar days ending at `today`.
pub fn completion_trend(tasks: &[Task], today: NaiveDate, days: u32) -> Result<Vec<TimelinePoint>> {
    if days == 0 {
        return Ok(Vec::new());
    }
    let start = window_start(today, days).ok_or_else(|| {
        TodoError::InvalidRange(format!("{days} days before {today} is out of range"))
    })?;
    Ok(compute_timeline(tasks, start, today))
}
