//! Scalar and distribution statistics over a task snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::fields::Priority;
use crate::task::Task;

/// Label used for tasks without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Task counts per priority. Every priority is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityDistribution {
    pub fn get(&self, p: Priority) -> usize {
        match p {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    fn bump(&mut self, p: Priority) {
        match p {
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub due_soon: usize,
    /// Whole percent in `0..=100`.
    pub completion_rate: u32,
    pub category_distribution: BTreeMap<String, usize>,
    pub priority_distribution: PriorityDistribution,
}

/// Statistics wrapped with export metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsExport {
    pub statistics: Statistics,
    pub export_date: DateTime<Utc>,
    pub total_tasks: usize,
}

impl StatisticsExport {
    pub fn new(statistics: Statistics, now: DateTime<Utc>) -> Self {
        let total_tasks = statistics.total;
        StatisticsExport { statistics, export_date: now, total_tasks }
    }

    /// Suggested file name, e.g. `task_statistics_2024-01-31.json`.
    pub fn file_name(&self) -> String {
        format!("task_statistics_{}.json", self.export_date.format("%Y-%m-%d"))
    }
}

/// Compute statistics for `tasks` as of `now`.
///
/// Tasks with no parsable due date are never overdue or due soon.
pub fn compute_statistics(tasks: &[Task], now: DateTime<Utc>) -> Statistics {
    let window = Duration::hours(24);
    let mut stats = Statistics { total: tasks.len(), ..Default::default() };

    for t in tasks {
        stats.priority_distribution.bump(t.priority);
        let category = t.category.as_deref().unwrap_or(UNCATEGORIZED);
        *stats
            .category_distribution
            .entry(category.to_string())
            .or_insert(0) += 1;

        if t.is_completed() {
            stats.completed += 1;
            continue;
        }
        if let Some(due) = t.due_at() {
            let left = due - now;
            if due < now {
                stats.overdue += 1;
            } else if left > Duration::zero() && left <= window {
                stats.due_soon += 1;
            }
        }
    }

    stats.pending = stats.total - stats.completed;
    stats.completion_rate = completion_rate(stats.completed, stats.total);
    stats
}

/// `round(completed / total * 100)`, halves rounding up; 0 for an empty list.
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed * 200 + total) / (total * 2)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Status;
    use crate::task::NewTask;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn task(priority: Priority, category: Option<&str>, due: Option<&str>, done: bool) -> Task {
        let mut t = Task::create(
            NewTask {
                title: "t".into(),
                priority,
                category: category.map(String::from),
                due_date: due.map(String::from),
                ..Default::default()
            },
            now() - Duration::days(3),
        );
        if done {
            t.set_status(Status::Completed, now());
        }
        t
    }

    #[test]
    fn test_empty_list() {
        let s = compute_statistics(&[], now());
        assert_eq!(s.total, 0);
        assert_eq!(s.completion_rate, 0);
        assert_eq!(s.priority_distribution, PriorityDistribution::default());
        assert!(s.category_distribution.is_empty());
    }

    #[test]
    fn test_counts_and_rate() {
        let tasks = vec![
            task(Priority::High, Some("Work"), Some("2024-06-09"), false),
            task(Priority::High, Some("Work"), Some("2024-06-11T06:00"), false),
            task(Priority::Low, None, Some("2024-06-20"), false),
            task(Priority::Medium, Some("Personal"), Some("2024-06-01"), true),
        ];
        let s = compute_statistics(&tasks, now());
        assert_eq!(s.total, 4);
        assert_eq!(s.completed, 1);
        assert_eq!(s.pending, 3);
        assert_eq!(s.overdue, 1);
        assert_eq!(s.due_soon, 1);
        assert_eq!(s.completion_rate, 25);
        assert_eq!(s.priority_distribution, PriorityDistribution { high: 2, medium: 1, low: 0 });
        assert_eq!(s.priority_distribution.total(), s.total);
        assert_eq!(s.completed + s.pending, s.total);
    }

    #[test]
    fn test_uncategorized_bucket() {
        let tasks = vec![
            task(Priority::Low, Some("Work"), None, false),
            task(Priority::Low, None, None, false),
        ];
        let s = compute_statistics(&tasks, now());
        let expected: BTreeMap<String, usize> =
            [("Work".to_string(), 1), (UNCATEGORIZED.to_string(), 1)].into_iter().collect();
        assert_eq!(s.category_distribution, expected);
    }

    #[test]
    fn test_invalid_due_dates_are_ignored() {
        let tasks = vec![
            task(Priority::Low, None, Some("someday"), false),
            task(Priority::Low, None, None, false),
        ];
        let s = compute_statistics(&tasks, now());
        assert_eq!(s.overdue, 0);
        assert_eq!(s.due_soon, 0);
    }

    #[test]
    fn test_due_soon_boundaries() {
        let exactly_now = task(Priority::Low, None, Some("2024-06-10T12:00"), false);
        let edge = task(Priority::Low, None, Some("2024-06-11T12:00"), false);
        let past_edge = task(Priority::Low, None, Some("2024-06-11T12:01"), false);
        let s = compute_statistics(&[exactly_now, edge, past_edge], now());
        assert_eq!(s.overdue, 0);
        assert_eq!(s.due_soon, 1);
    }

    #[test]
    fn test_completed_tasks_never_overdue() {
        let s = compute_statistics(&[task(Priority::High, None, Some("2020-01-01"), true)], now());
        assert_eq!(s.overdue, 0);
        assert_eq!(s.completion_rate, 100);
    }

    #[test]
    fn test_completion_rate_rounding() {
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(1, 8), 13);
        assert_eq!(completion_rate(0, 5), 0);
        assert_eq!(completion_rate(5, 5), 100);
    }

    #[test]
    fn test_export_file_name() {
        let export = StatisticsExport::new(compute_statistics(&[], now()), now());
        assert_eq!(export.file_name(), "task_statistics_2024-06-10.json");
        assert_eq!(export.total_tasks, 0);
    }
}
