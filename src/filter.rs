//! Compound list filters.

use crate::fields::{Priority, StatusFilter};
use crate::task::Task;

/// Category value that places no constraint.
pub const ALL_CATEGORIES: &str = "all";

/// Filter criteria. Every dimension left at its default places no constraint;
/// set dimensions are combined with AND. A blank category or the literal
/// `all` is treated the same as `None`.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub priority: Option<Priority>,
    pub status: StatusFilter,
    pub category: Option<String>,
    pub search_term: Option<String>,
}

impl FilterCriteria {
    /// The category a task must carry, if any.
    pub fn category_constraint(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }

    /// Whether `task` satisfies every set dimension.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(p) = self.priority {
            if task.priority != p {
                return false;
            }
        }
        match self.status {
            StatusFilter::All => {}
            StatusFilter::Completed if !task.is_completed() => return false,
            StatusFilter::Pending if task.is_completed() => return false,
            _ => {}
        }
        if let Some(c) = self.category_constraint() {
            if task.category.as_deref() != Some(c) {
                return false;
            }
        }
        match self.search_term.as_deref() {
            Some(term) if !term.is_empty() => matches_search(task, &term.to_lowercase()),
            _ => true,
        }
    }
}

/// Case-insensitive substring match over title, description and category.
fn matches_search(task: &Task, needle: &str) -> bool {
    [
        Some(task.title.as_str()),
        task.description.as_deref(),
        task.category.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Tasks matching `criteria`, in input order.
pub fn filter_tasks(tasks: &[Task], criteria: &FilterCriteria) -> Vec<Task> {
    tasks.iter().filter(|t| criteria.matches(t)).cloned().collect()
}
