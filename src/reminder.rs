//! Due-date reminders with per-class latches.
//!
//! A task fires at most one reminder per class (overdue, warning, upcoming);
//! the matching `*_notified` flag on the task is the latch.

use chrono::{DateTime, Utc};

use crate::task::Task;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Thresholds in whole days until due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSettings {
    pub upcoming_days: i64,
    pub warning_days: i64,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        ReminderSettings { upcoming_days: 3, warning_days: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    Overdue,
    Warning,
    Upcoming,
}

impl ReminderKind {
    pub fn label(self) -> &'static str {
        match self {
            ReminderKind::Overdue => "overdue",
            ReminderKind::Warning => "warning",
            ReminderKind::Upcoming => "upcoming",
        }
    }

    fn is_latched(self, task: &Task) -> bool {
        match self {
            ReminderKind::Overdue => task.overdue_notified,
            ReminderKind::Warning => task.warning_notified,
            ReminderKind::Upcoming => task.upcoming_notified,
        }
    }

    /// Set the latch for this class on `task`.
    pub fn latch(self, task: &mut Task) {
        match self {
            ReminderKind::Overdue => task.overdue_notified = true,
            ReminderKind::Warning => task.warning_notified = true,
            ReminderKind::Upcoming => task.upcoming_notified = true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub task_id: String,
    pub kind: ReminderKind,
    pub days_until_due: i64,
    pub message: String,
}

/// Whole days until `due`, rounded up; negative once the due time passed.
pub fn days_until_due(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (due - now).num_milliseconds();
    ms.div_euclid(DAY_MS) + i64::from(ms.rem_euclid(DAY_MS) != 0)
}

/// Which reminder class applies `days` before the due date, if any.
pub fn classify(days: i64, settings: &ReminderSettings) -> Option<ReminderKind> {
    if days < 0 {
        Some(ReminderKind::Overdue)
    } else if days <= settings.warning_days {
        Some(ReminderKind::Warning)
    } else if days <= settings.upcoming_days {
        Some(ReminderKind::Upcoming)
    } else {
        None
    }
}

fn message(task: &Task, kind: ReminderKind, days: i64) -> String {
    match kind {
        ReminderKind::Overdue => format!("Task \"{}\" is overdue!", task.title),
        ReminderKind::Warning => {
            let when = if days == 0 { "today" } else { "tomorrow" };
            format!("Task \"{}\" is due {}!", task.title, when)
        }
        ReminderKind::Upcoming => format!("Task \"{}\" is due in {} days", task.title, days),
    }
}

/// Reminders due for `tasks` at `now`. Completed and undated tasks never
/// fire, and a class whose latch is already set stays quiet.
pub fn due_reminders(tasks: &[Task], now: DateTime<Utc>, settings: &ReminderSettings) -> Vec<Reminder> {
    tasks
        .iter()
        .filter(|t| !t.is_completed())
        .filter_map(|t| {
            let days = days_until_due(t.due_at()?, now);
            let kind = classify(days, settings)?;
            if kind.is_latched(t) {
                return None;
            }
            Some(Reminder {
                task_id: t.id.clone(),
                kind,
                days_until_due: days,
                message: message(t, kind, days),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Status;
    use crate::task::NewTask;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn due_in(title: &str, offset: Duration) -> Task {
        let due = (now() + offset).to_rfc3339();
        Task::create(
            NewTask { title: title.into(), due_date: Some(due), ..Default::default() },
            now() - Duration::days(10),
        )
    }

    #[test]
    fn test_days_until_due_rounds_up() {
        assert_eq!(days_until_due(now() + Duration::hours(1), now()), 1);
        assert_eq!(days_until_due(now() + Duration::hours(24), now()), 1);
        assert_eq!(days_until_due(now() + Duration::hours(25), now()), 2);
        assert_eq!(days_until_due(now(), now()), 0);
        assert_eq!(days_until_due(now() - Duration::hours(1), now()), 0);
        assert_eq!(days_until_due(now() - Duration::hours(25), now()), -1);
    }

    #[test]
    fn test_classes_and_messages() {
        let tasks = vec![
            due_in("Late", -Duration::days(2)),
            due_in("Soon", Duration::hours(5)),
            due_in("Later", Duration::days(3)),
            due_in("Far", Duration::days(10)),
        ];
        let reminders = due_reminders(&tasks, now(), &ReminderSettings::default());
        let kinds: Vec<ReminderKind> = reminders.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ReminderKind::Overdue, ReminderKind::Warning, ReminderKind::Upcoming]);
        assert_eq!(reminders[0].message, "Task \"Late\" is overdue!");
        assert_eq!(reminders[1].message, "Task \"Soon\" is due tomorrow!");
        assert_eq!(reminders[2].message, "Task \"Later\" is due in 3 days");
    }

    #[test]
    fn test_latched_class_stays_quiet() {
        let mut late = due_in("Late", -Duration::days(1));
        ReminderKind::Overdue.latch(&mut late);
        assert!(due_reminders(&[late], now(), &ReminderSettings::default()).is_empty());

        // A task that moved into a new class fires again.
        let mut soon = due_in("Soon", Duration::hours(3));
        ReminderKind::Upcoming.latch(&mut soon);
        let r = due_reminders(&[soon], now(), &ReminderSettings::default());
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].kind, ReminderKind::Warning);
    }

    #[test]
    fn test_completed_and_undated_skipped() {
        let mut done = due_in("Done", -Duration::days(1));
        done.set_status(Status::Completed, now());
        let undated = Task::create(NewTask { title: "Whenever".into(), ..Default::default() }, now());
        let mut garbage = undated.clone();
        garbage.due_date = Some("not a date".into());
        assert!(due_reminders(&[done, undated, garbage], now(), &ReminderSettings::default()).is_empty());
    }

    #[test]
    fn test_custom_thresholds() {
        let settings = ReminderSettings { upcoming_days: 7, warning_days: 2 };
        assert_eq!(classify(2, &settings), Some(ReminderKind::Warning));
        assert_eq!(classify(6, &settings), Some(ReminderKind::Upcoming));
        assert_eq!(classify(8, &settings), None);
    }
}
