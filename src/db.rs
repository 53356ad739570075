//! File-backed task store and the collaborator trait the analytics read from.
//!
//! This module provides the `Database` struct for storing tasks and
//! categories in a single JSON file, along with the mutation operations
//! (add, partial update, delete, category management, bulk actions).

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, TodoError};
use crate::fields::Status;
use crate::reminder::Reminder;
use crate::task::{NewTask, Task, TaskPatch};

/// Categories a fresh store starts with.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["Work", "Personal", "Shopping"];

/// Read access to a task snapshot. Analytics take the store explicitly
/// through this trait instead of reaching for shared state.
pub trait TaskStore {
    fn all_tasks(&self) -> Vec<Task>;
    fn all_categories(&self) -> Vec<String>;
}

/// In-memory database for storing and managing tasks.
#[derive(Debug, Serialize, Deserialize)]
pub struct Database {
    pub tasks: Vec<Task>,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

impl Default for Database {
    fn default() -> Self {
        Database { tasks: Vec::new(), categories: default_categories() }
    }
}

/// Selected tasks wrapped with export metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskExport {
    pub tasks: Vec<Task>,
    pub export_date: DateTime<Utc>,
    pub total_tasks: usize,
}

impl TaskExport {
    /// Suggested file name, e.g. `tasks_export_2024-01-31.json`.
    pub fn file_name(&self) -> String {
        format!("tasks_export_{}.json", self.export_date.format("%Y-%m-%d"))
    }
}

impl TaskStore for Database {
    fn all_tasks(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    fn all_categories(&self) -> Vec<String> {
        self.categories.clone()
    }
}

impl Database {
    /// Load database from JSON file, creating a new empty database if file doesn't exist.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no store file, starting empty");
            return Database::default();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(db) => db,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "error parsing store, starting fresh");
                    Database::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "error reading store, starting fresh");
                Database::default()
            }
        }
    }

    /// Save database to JSON file using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        debug!(path = %path.display(), tasks = self.tasks.len(), "store saved");
        Ok(())
    }

    /// Get a task by ID.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Add a new pending task and return a copy of it.
    pub fn add_task(&mut self, new: NewTask, now: DateTime<Utc>) -> Task {
        let task = Task::create(new, now);
        info!(id = %task.id, title = %task.title, "task added");
        self.tasks.push(task.clone());
        task
    }

    /// Merge `patch` into the task with `id`.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch, now: DateTime<Utc>) -> Result<Task> {
        let task = self
            .get_mut(id)
            .ok_or_else(|| TodoError::TaskNotFound { id: id.to_string() })?;
        task.apply(patch, now);
        debug!(id, status = ?task.status(), "task updated");
        Ok(task.clone())
    }

    /// Remove a single task. Children keep their parent reference and show
    /// up as roots until re-parented.
    pub fn delete_task(&mut self, id: &str) -> Result<()> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Err(TodoError::TaskNotFound { id: id.to_string() });
        }
        info!(id, "task deleted");
        Ok(())
    }

    /// Add a category. Names are matched exactly, case included.
    pub fn add_category(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TodoError::EmptyCategoryName);
        }
        if self.categories.iter().any(|c| c == name) {
            return Err(TodoError::CategoryExists { name: name.to_string() });
        }
        self.categories.push(name.to_string());
        info!(name, "category added");
        Ok(())
    }

    /// Remove a category and clear it on every task that used it.
    /// Returns the number of tasks touched; tasks are never deleted.
    pub fn delete_category(&mut self, name: &str) -> Result<usize> {
        let idx = self
            .categories
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TodoError::CategoryNotFound { name: name.to_string() })?;
        self.categories.remove(idx);
        let mut touched = 0;
        for t in self.tasks.iter_mut().filter(|t| t.category.as_deref() == Some(name)) {
            t.category = None;
            touched += 1;
        }
        info!(name, touched, "category deleted");
        Ok(touched)
    }

    /// Drop every task and restore the default categories.
    pub fn clear(&mut self) {
        *self = Database::default();
        info!("store cleared");
    }

    /// Mark every listed task completed. Unknown ids are skipped.
    pub fn complete_many(&mut self, ids: &HashSet<String>, now: DateTime<Utc>) -> usize {
        let mut n = 0;
        for t in self.tasks.iter_mut().filter(|t| ids.contains(&t.id)) {
            t.set_status(Status::Completed, now);
            n += 1;
        }
        n
    }

    /// Delete every listed task. Unknown ids are skipped.
    pub fn delete_many(&mut self, ids: &HashSet<String>) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !ids.contains(&t.id));
        before - self.tasks.len()
    }

    /// Set (or with `None`, clear) the category of every listed task.
    pub fn set_category_many(&mut self, ids: &HashSet<String>, category: Option<String>, now: DateTime<Utc>) -> usize {
        let mut n = 0;
        for t in self.tasks.iter_mut().filter(|t| ids.contains(&t.id)) {
            t.apply(TaskPatch { category: Some(category.clone()), ..Default::default() }, now);
            n += 1;
        }
        n
    }

    /// Snapshot the listed tasks for export, in store order.
    pub fn export_tasks(&self, ids: &HashSet<String>, now: DateTime<Utc>) -> TaskExport {
        let tasks: Vec<Task> = self.tasks.iter().filter(|t| ids.contains(&t.id)).cloned().collect();
        TaskExport { total_tasks: tasks.len(), tasks, export_date: now }
    }

    /// Set the latch for each fired reminder.
    pub fn latch_reminders(&mut self, reminders: &[Reminder]) {
        for r in reminders {
            if let Some(t) = self.get_mut(&r.task_id) {
                r.kind.latch(t);
            }
        }
    }
}

/// Resolve a task identifier (full id, unique id prefix, or exact title) to a task ID.
/// Returns an error if the identifier is ambiguous or matches nothing.
pub fn resolve_task_identifier(identifier: &str, db: &Database) -> std::result::Result<String, String> {
    if db.get(identifier).is_some() {
        return Ok(identifier.to_string());
    }

    let by_prefix: Vec<&Task> = db.tasks.iter().filter(|t| t.id.starts_with(identifier)).collect();
    if by_prefix.len() == 1 {
        return Ok(by_prefix[0].id.clone());
    }

    let matches: Vec<&Task> = db
        .tasks
        .iter()
        .filter(|task| task.title.to_lowercase() == identifier.to_lowercase())
        .collect();

    match matches.len() {
        0 if by_prefix.is_empty() => Err(format!("No task found with id or name '{}'", identifier)),
        0 => Err(format!("Id prefix '{}' matches {} tasks", identifier, by_prefix.len())),
        1 => Ok(matches[0].id.clone()),
        _ => {
            let mut error_msg = format!("Multiple tasks found with name '{}':\n", identifier);
            for task in matches {
                error_msg.push_str(&format!("  ID {}: {}", short_id(&task.id), task.title));
                if let Some(ref category) = task.category {
                    error_msg.push_str(&format!(" [category: {}]", category));
                }
                error_msg.push('\n');
            }
            error_msg.push_str("Please use the specific ID instead.");
            Err(error_msg)
        }
    }
}

/// First eight characters of an id, enough to be unique in practice.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
