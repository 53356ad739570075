//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct, the inputs used to create and
//! partially update it, and the JSON record shape that storage collaborators
//! read and write.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::*;

/// A single to-do item.
///
/// Completion is held by one private `status` field; the legacy boolean view
/// is [`Task::is_completed`]. `completed_at` only changes through
/// [`Task::set_status`], so it is always `Some` exactly when the task is
/// completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Raw due date as entered. Parsed on demand by [`Task::due_at`].
    pub due_date: Option<String>,
    pub priority: Priority,
    pub category: Option<String>,
    status: Status,
    completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub parent_id: Option<String>,
    pub overdue_notified: bool,
    pub warning_notified: bool,
    pub upcoming_notified: bool,
}

/// Fields supplied by the caller when adding a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Priority,
    pub category: Option<String>,
    pub parent_id: Option<String>,
}

/// A partial update. `None` leaves a field untouched; for the nullable fields
/// `Some(None)` clears the value.
///
/// When both `status` and `completed` are given, `status` wins.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub category: Option<Option<String>>,
    pub parent_id: Option<Option<String>>,
    pub status: Option<Status>,
    pub completed: Option<bool>,
}

impl Task {
    /// Create a pending task with a fresh id, stamped at `now`.
    pub fn create(new: NewTask, now: DateTime<Utc>) -> Self {
        Task {
            id: Uuid::new_v4().simple().to_string(),
            title: new.title,
            description: non_empty(new.description),
            due_date: non_empty(new.due_date),
            priority: new.priority,
            category: non_empty(new.category),
            status: Status::Pending,
            completed_at: None,
            created_at: now,
            parent_id: non_empty(new.parent_id),
            overdue_notified: false,
            warning_notified: false,
            upcoming_notified: false,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Move the task to `status`. A pending → completed transition stamps
    /// `completed_at` with `now`; re-completing keeps the original stamp and
    /// going back to pending clears it.
    pub fn set_status(&mut self, status: Status, now: DateTime<Utc>) {
        match status {
            Status::Completed => {
                if self.status != Status::Completed || self.completed_at.is_none() {
                    self.completed_at = Some(now);
                }
            }
            Status::Pending => self.completed_at = None,
        }
        self.status = status;
    }

    /// Merge a partial update into this task.
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = non_empty(description);
        }
        if let Some(due) = patch.due_date {
            self.due_date = non_empty(due);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(category) = patch.category {
            self.category = non_empty(category);
        }
        if let Some(parent) = patch.parent_id {
            self.parent_id = non_empty(parent);
        }
        let target = patch.status.or_else(|| {
            patch
                .completed
                .map(|c| if c { Status::Completed } else { Status::Pending })
        });
        if let Some(status) = target {
            self.set_status(status, now);
        }
    }

    /// The parsed due date, or `None` when absent or unparsable.
    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due_date.as_deref().and_then(parse_due)
    }
}

/// Parse a due date. Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` and plain
/// `YYYY-MM-DD` (midnight). Values without an offset are taken as UTC.
pub fn parse_due(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// On-disk record. Carries both `status` and the mirrored `completed`
/// boolean so older readers keep working; an empty category is `""`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    status: Option<Status>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    overdue_notified: bool,
    #[serde(default)]
    warning_notified: bool,
    #[serde(default)]
    upcoming_notified: bool,
}

impl From<TaskRecord> for Task {
    fn from(r: TaskRecord) -> Self {
        let done = r.status == Some(Status::Completed) || r.completed == Some(true);
        let (status, completed_at) = if done {
            // Legacy records may be completed without a stamp.
            (Status::Completed, r.completed_at)
        } else {
            (Status::Pending, None)
        };
        Task {
            id: r.id,
            title: r.title,
            description: non_empty(r.description),
            due_date: non_empty(r.due_date),
            priority: r.priority,
            category: non_empty(r.category),
            status,
            completed_at,
            created_at: r.created_at,
            parent_id: non_empty(r.parent_id),
            overdue_notified: r.overdue_notified,
            warning_notified: r.warning_notified,
            upcoming_notified: r.upcoming_notified,
        }
    }
}

impl From<Task> for TaskRecord {
    fn from(t: Task) -> Self {
        TaskRecord {
            id: t.id,
            title: t.title,
            description: t.description,
            due_date: t.due_date,
            priority: t.priority,
            category: Some(t.category.unwrap_or_default()),
            completed: Some(t.status == Status::Completed),
            status: Some(t.status),
            completed_at: t.completed_at,
            created_at: t.created_at,
            parent_id: t.parent_id,
            overdue_notified: t.overdue_notified,
            warning_notified: t.warning_notified,
            upcoming_notified: t.upcoming_notified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn new_task(title: &str) -> Task {
        Task::create(
            NewTask { title: title.into(), ..Default::default() },
            at("2024-01-01T09:00:00Z"),
        )
    }

    #[test]
    fn test_completion_stamps_and_clears() {
        let mut t = new_task("Write report");
        assert!(!t.is_completed());
        assert_eq!(t.completed_at(), None);

        t.set_status(Status::Completed, at("2024-01-02T10:00:00Z"));
        assert!(t.is_completed());
        assert_eq!(t.completed_at(), Some(at("2024-01-02T10:00:00Z")));

        // Completing again keeps the first stamp.
        t.set_status(Status::Completed, at("2024-01-05T10:00:00Z"));
        assert_eq!(t.completed_at(), Some(at("2024-01-02T10:00:00Z")));

        t.set_status(Status::Pending, at("2024-01-06T10:00:00Z"));
        assert_eq!(t.status(), Status::Pending);
        assert_eq!(t.completed_at(), None);
    }

    #[test]
    fn test_patch_status_wins_over_boolean() {
        let mut t = new_task("Pay rent");
        t.apply(
            TaskPatch {
                status: Some(Status::Pending),
                completed: Some(true),
                ..Default::default()
            },
            at("2024-01-02T00:00:00Z"),
        );
        assert!(!t.is_completed());

        t.apply(
            TaskPatch { completed: Some(true), ..Default::default() },
            at("2024-01-03T00:00:00Z"),
        );
        assert!(t.is_completed());
        assert_eq!(t.completed_at(), Some(at("2024-01-03T00:00:00Z")));
    }

    #[test]
    fn test_patch_clears_nullable_fields() {
        let mut t = Task::create(
            NewTask {
                title: "Groceries".into(),
                category: Some("Shopping".into()),
                parent_id: Some("p1".into()),
                ..Default::default()
            },
            at("2024-01-01T00:00:00Z"),
        );
        t.apply(
            TaskPatch {
                category: Some(None),
                parent_id: Some(Some(String::new())),
                title: Some("Groceries for the week".into()),
                ..Default::default()
            },
            at("2024-01-01T00:00:00Z"),
        );
        assert_eq!(t.category, None);
        assert_eq!(t.parent_id, None);
        assert_eq!(t.title, "Groceries for the week");
    }

    #[test]
    fn test_parse_due_formats() {
        assert_eq!(parse_due("2024-03-01"), Some(at("2024-03-01T00:00:00Z")));
        assert_eq!(parse_due("2024-03-01T14:30"), Some(at("2024-03-01T14:30:00Z")));
        assert_eq!(parse_due("2024-03-01T14:30:00.000Z"), Some(at("2024-03-01T14:30:00Z")));
        assert_eq!(parse_due("2024-03-01T14:30:00+02:00"), Some(at("2024-03-01T12:30:00Z")));
        assert_eq!(parse_due("next week"), None);
        assert_eq!(parse_due(""), None);
    }

    #[test]
    fn test_record_reads_legacy_completed_flag() {
        let json = r#"{
            "id": "abc",
            "title": "Legacy",
            "priority": "High",
            "category": "",
            "completed": true,
            "createdAt": "2024-01-01T00:00:00.000Z"
        }"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert!(t.is_completed());
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.category, None);
        assert_eq!(t.due_at(), None);
    }

    #[test]
    fn test_record_writes_status_and_mirror() {
        let mut t = new_task("Mirror");
        t.set_status(Status::Completed, at("2024-01-02T00:00:00Z"));
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["status"], "completed");
        assert_eq!(v["completed"], true);
        assert_eq!(v["category"], "");
        assert!(v.get("completedAt").is_some());
        assert!(v.get("createdAt").is_some());
    }

    #[test]
    fn test_record_pending_status_drops_stale_stamp() {
        let json = r#"{
            "id": "x",
            "title": "Stale",
            "status": "pending",
            "completed": false,
            "completedAt": "2024-01-02T00:00:00Z",
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.completed_at(), None);
    }
}
