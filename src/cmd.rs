//! Command implementations for the CLI interface.
//!
//! Each handler takes the loaded `Database`, performs one subcommand and
//! returns `Result`; printing is the only presentation this crate does.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::warn;

use crate::db::*;
use crate::error::{Result, TodoError};
use crate::fields::*;
use crate::filter::{filter_tasks, FilterCriteria};
use crate::hierarchy::{build_forest, find_node, unreachable_ids, walk_forest, would_cycle};
use crate::reminder::{due_reminders, ReminderSettings};
use crate::stats::{compute_statistics, Statistics, StatisticsExport, UNCATEGORIZED};
use crate::task::{parse_due, NewTask, Task, TaskPatch};
use crate::timeline::{completion_trend, compute_timeline, window_start, TimelinePoint};

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Due date: YYYY-MM-DD or YYYY-MM-DDTHH:MM (UTC).
        #[arg(long)]
        due: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Low)]
        priority: Priority,
        /// Category name.
        #[arg(long)]
        category: Option<String>,
        /// Parent task ID or name.
        #[arg(long)]
        parent: Option<String>,
    },

    /// List tasks with optional filters.
    List {
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Filter by status.
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,
        /// Filter by category.
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive text search over title, description and category.
        #[arg(long, short)]
        search: Option<String>,
        /// Render as a tree across parent-child relationships.
        #[arg(long)]
        tree: bool,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by ID or name.
    View {
        /// Task ID, ID prefix or name to view
        id: String,
        /// Show child subtree.
        #[arg(long)]
        children: bool,
    },

    /// Update fields on a task.
    Update {
        /// Task ID, ID prefix or name to update
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        category: Option<String>,
        /// Parent task ID or name.
        #[arg(long)]
        parent: Option<String>,
        /// Clear description.
        #[arg(long)]
        clear_desc: bool,
        /// Clear due date.
        #[arg(long)]
        clear_due: bool,
        /// Clear category.
        #[arg(long)]
        clear_category: bool,
        /// Clear parent.
        #[arg(long)]
        clear_parent: bool,
    },

    /// Mark a task completed.
    Complete {
        /// Task ID, ID prefix or name
        id: String,
    },

    /// Reopen a task (status pending).
    Reopen {
        /// Task ID, ID prefix or name
        id: String,
    },

    /// Delete a task by ID or name. Its children become top-level tasks.
    Delete {
        /// Task ID, ID prefix or name
        id: String,
    },

    /// Manage categories.
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Show task statistics.
    Stats {
        /// Print the statistics export as JSON.
        #[arg(long)]
        json: bool,
        /// Write the JSON export to this file (or directory).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show per-day pending/completed counts.
    Timeline {
        /// First day (YYYY-MM-DD). Defaults to `--days` before `--to`.
        #[arg(long)]
        from: Option<String>,
        /// Last day (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        to: Option<String>,
        /// Window length when `--from` is omitted.
        #[arg(long, default_value_t = 30)]
        days: u32,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show completions per day for the last few days.
    Trend {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },

    /// Print due-date reminders and mark them as sent.
    Remind {
        /// Print without marking reminders as sent.
        #[arg(long)]
        dry_run: bool,
    },

    /// Apply one action to several tasks.
    Bulk {
        #[command(subcommand)]
        action: BulkAction,
    },

    /// Delete all tasks and restore default categories.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories with task counts.
    List,
    /// Add a category.
    Add { name: String },
    /// Delete a category. Tasks in it become uncategorised.
    Delete { name: String },
}

#[derive(Subcommand)]
pub enum BulkAction {
    /// Mark the given tasks completed.
    Complete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete the given tasks.
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Set the category of the given tasks. Omit `--name` to clear it.
    Category {
        #[arg(long)]
        name: Option<String>,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Export the given tasks as JSON.
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

fn resolve(identifier: &str, db: &Database) -> Result<String> {
    resolve_task_identifier(identifier, db).map_err(TodoError::Resolve)
}

fn resolve_all(identifiers: &[String], db: &Database) -> Result<HashSet<String>> {
    identifiers.iter().map(|i| resolve(i, db)).collect()
}

fn validate_due(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if parse_due(raw).is_none() {
        return Err(TodoError::InvalidDate { input: raw.to_string() });
    }
    Ok(raw.to_string())
}

fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| TodoError::InvalidDate { input: raw.to_string() })
}

fn warn_unknown_category(db: &Database, category: Option<&str>) {
    if let Some(c) = category {
        if !db.categories.iter().any(|known| known == c) {
            warn!(category = c, "category is not in the category list");
        }
    }
}

/// Add a new task to the database.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    db: &mut Database,
    db_path: &Path,
    title: String,
    due: String,
    desc: Option<String>,
    priority: Priority,
    category: Option<String>,
    parent: Option<String>,
) -> Result<()> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(TodoError::EmptyTitle);
    }
    let due = validate_due(&due)?;
    let parent_id = parent.map(|p| resolve(&p, db)).transpose()?;
    warn_unknown_category(db, category.as_deref());

    let task = db.add_task(
        NewTask { title, description: desc, due_date: Some(due), priority, category, parent_id },
        Utc::now(),
    );
    db.save(db_path)?;
    println!("Added {} {}", short_id(&task.id), task.title);
    Ok(())
}

/// List tasks that match the filters, flat or as a tree.
pub fn cmd_list(db: &Database, criteria: FilterCriteria, tree: bool, limit: Option<usize>) {
    let tasks = db.all_tasks();
    let filtered = filter_tasks(&tasks, &criteria);

    let forest = if tree { build_forest(&filtered) } else { Vec::new() };
    let rows: Vec<(usize, &Task)> = if tree {
        let hidden = unreachable_ids(&filtered, &forest);
        if !hidden.is_empty() {
            warn!(count = hidden.len(), "tasks in a parent cycle are not shown in the tree");
        }
        walk_forest(&forest)
    } else {
        filtered.iter().map(|t| (0, t)).collect()
    };

    let rows = match limit {
        Some(n) => &rows[..rows.len().min(n)],
        None => &rows[..],
    };
    if rows.is_empty() {
        println!("No tasks match your current filters.");
        return;
    }
    print_table(rows, Utc::now());
}

/// View detailed information about a specific task.
pub fn cmd_view(db: &Database, id: String, children: bool) -> Result<()> {
    let task_id = resolve(&id, db)?;
    let task = db
        .get(&task_id)
        .ok_or_else(|| TodoError::TaskNotFound { id: task_id.clone() })?;
    let now = Utc::now();
    println!("ID:           {}", task.id);
    println!("Title:        {}", task.title);
    println!("Status:       {}", format_status(task.status()));
    println!("Priority:     {}", format_priority(task.priority));
    println!("Category:     {}", task.category.as_deref().unwrap_or("-"));
    println!(
        "Due:          {}",
        match (task.due_date.as_deref(), task.due_at()) {
            (Some(raw), Some(d)) => format!("{raw} ({})", format_due_relative(Some(d), now)),
            (Some(raw), None) => format!("{raw} (unrecognised date)"),
            _ => "-".into(),
        }
    );
    println!("Parent:       {}", task.parent_id.as_deref().map(short_id).unwrap_or("-"));
    println!("Created UTC:  {}", task.created_at.to_rfc3339());
    println!(
        "Completed:    {}",
        task.completed_at().map(|c| c.to_rfc3339()).unwrap_or_else(|| "-".into())
    );
    println!("Description:\n{}\n", task.description.as_deref().unwrap_or("-"));

    if children {
        println!("Children:");
        let forest = build_forest(&db.tasks);
        match find_node(&forest, &task_id) {
            Some(node) if !node.children.is_empty() => {
                for (depth, t) in node.walk().into_iter().skip(1) {
                    println!(
                        "{}- {} [{}] (#{})",
                        "  ".repeat(depth),
                        t.title,
                        format_status(t.status()),
                        short_id(&t.id)
                    );
                }
            }
            _ => println!("  -"),
        }
    }
    Ok(())
}

/// Update an existing task's fields.
#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    db: &mut Database,
    db_path: &Path,
    id: String,
    title: Option<String>,
    desc: Option<String>,
    due: Option<String>,
    priority: Option<Priority>,
    category: Option<String>,
    parent: Option<String>,
    clear_desc: bool,
    clear_due: bool,
    clear_category: bool,
    clear_parent: bool,
) -> Result<()> {
    let task_id = resolve(&id, db)?;

    if let Some(ref t) = title {
        if t.trim().is_empty() {
            return Err(TodoError::EmptyTitle);
        }
    }
    let due = due.map(|d| validate_due(&d)).transpose()?;
    let parent = parent.map(|p| resolve(&p, db)).transpose()?;
    if let Some(ref p) = parent {
        if would_cycle(&db.tasks, &task_id, p) {
            return Err(TodoError::ParentCycle { id: task_id, parent: p.clone() });
        }
    }
    warn_unknown_category(db, category.as_deref());

    let patch = TaskPatch {
        title: title.map(|t| t.trim().to_string()),
        description: if clear_desc { Some(None) } else { desc.map(Some) },
        due_date: if clear_due { Some(None) } else { due.map(Some) },
        priority,
        category: if clear_category { Some(None) } else { category.map(Some) },
        parent_id: if clear_parent { Some(None) } else { parent.map(Some) },
        ..Default::default()
    };
    let task = db.update_task(&task_id, patch, Utc::now())?;
    db.save(db_path)?;
    println!("Updated {} {}", short_id(&task.id), task.title);
    Ok(())
}

/// Complete or reopen a task.
pub fn cmd_set_status(db: &mut Database, db_path: &Path, id: String, status: Status) -> Result<()> {
    let task_id = resolve(&id, db)?;
    let patch = TaskPatch { status: Some(status), ..Default::default() };
    let task = db.update_task(&task_id, patch, Utc::now())?;
    db.save(db_path)?;
    match status {
        Status::Completed => println!("Marked done: {}", task.title),
        Status::Pending => println!("Reopened {}", short_id(&task.id)),
    }
    Ok(())
}

/// Delete a single task.
pub fn cmd_delete(db: &mut Database, db_path: &Path, id: String) -> Result<()> {
    let task_id = resolve(&id, db)?;
    let orphaned = db
        .tasks
        .iter()
        .filter(|t| t.parent_id.as_deref() == Some(task_id.as_str()))
        .count();
    db.delete_task(&task_id)?;
    db.save(db_path)?;
    println!("Deleted.");
    if orphaned > 0 {
        println!("{} child task(s) are now top-level.", orphaned);
    }
    Ok(())
}

/// Handle category management commands.
pub fn cmd_category(db: &mut Database, db_path: &Path, action: CategoryAction) -> Result<()> {
    match action {
        CategoryAction::List => {
            let stats = compute_statistics(&db.all_tasks(), Utc::now());
            println!("{:<20} {}", "Category", "Count");
            for name in db.all_categories() {
                let count = stats.category_distribution.get(&name).copied().unwrap_or(0);
                println!("{:<20} {}", truncate(&name, 20), count);
            }
            if let Some(n) = stats.category_distribution.get(UNCATEGORIZED) {
                println!("{:<20} {}", format!("({})", UNCATEGORIZED), n);
            }
        }
        CategoryAction::Add { name } => {
            db.add_category(&name)?;
            db.save(db_path)?;
            println!("Category saved: {}", name.trim());
        }
        CategoryAction::Delete { name } => {
            let touched = db.delete_category(&name)?;
            db.save(db_path)?;
            println!("Category deleted: {} ({} task(s) uncategorised)", name, touched);
        }
    }
    Ok(())
}

/// Print statistics, or write the JSON export.
pub fn cmd_stats(db: &Database, json: bool, output: Option<PathBuf>) -> Result<()> {
    let now = Utc::now();
    let stats = compute_statistics(&db.all_tasks(), now);

    if json || output.is_some() {
        let export = StatisticsExport::new(stats, now);
        let data = serde_json::to_string_pretty(&export)?;
        match output {
            Some(path) => {
                let path = if path.is_dir() { path.join(export.file_name()) } else { path };
                std::fs::write(&path, data)?;
                println!("Exported statistics to {}", path.display());
            }
            None => println!("{data}"),
        }
        return Ok(());
    }

    print_statistics(&stats);
    Ok(())
}

fn print_statistics(stats: &Statistics) {
    println!("Total tasks:      {}", stats.total);
    println!("Completed:        {}", stats.completed);
    println!("Pending:          {}", stats.pending);
    println!("Completion rate:  {}% {}", stats.completion_rate, bar(stats.completion_rate as usize, 100, 20));
    println!("Overdue:          {}", stats.overdue);
    println!("Due in 24h:       {}", stats.due_soon);

    println!("\nPriority distribution:");
    if stats.priority_distribution.total() == 0 {
        println!("  No tasks available");
    } else {
        for p in Priority::ALL {
            let n = stats.priority_distribution.get(p);
            println!("  {:<8} {:>4} {}", format_priority(p), n, bar(n, stats.total, 20));
        }
    }

    println!("\nCategory distribution:");
    if stats.category_distribution.is_empty() {
        println!("  No categories available");
    }
    for (name, n) in &stats.category_distribution {
        let pct = (n * 100 + stats.total / 2) / stats.total.max(1);
        println!("  {:<16} {:>4} ({}%)", truncate(name, 16), n, pct);
    }
}

/// Print the per-day timeline.
pub fn cmd_timeline(db: &Database, from: Option<String>, to: Option<String>, days: u32, json: bool) -> Result<()> {
    let end = match to {
        Some(raw) => parse_day(&raw)?,
        None => Utc::now().date_naive(),
    };
    let start = match from {
        Some(raw) => parse_day(&raw)?,
        None => window_start(end, days).ok_or_else(|| {
            TodoError::InvalidRange(format!("{days} days before {end} is out of range"))
        })?,
    };
    let points = compute_timeline(&db.all_tasks(), start, end);
    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }
    if points.is_empty() {
        println!("No days in range {} .. {}", start, end);
        return Ok(());
    }
    print_timeline(&points);
    Ok(())
}

/// Print completions per day for the trailing window.
pub fn cmd_trend(db: &Database, days: u32) -> Result<()> {
    let trend = completion_trend(&db.all_tasks(), Utc::now().date_naive(), days)?;
    let peak = trend.iter().map(|p| p.completed).max().unwrap_or(0);
    println!("{:<12} {}", "Date", "Completed");
    for p in &trend {
        println!("{:<12} {:>4} {}", p.date.format("%b %d"), p.completed, bar(p.completed, peak, 20));
    }
    Ok(())
}

fn print_timeline(points: &[TimelinePoint]) {
    println!("{:<12} {:>8} {:>10}", "Date", "Pending", "Completed");
    for p in points {
        println!("{:<12} {:>8} {:>10}", p.date, p.pending, p.completed);
    }
}

/// Print due reminders and latch them unless `dry_run`.
pub fn cmd_remind(db: &mut Database, db_path: &Path, settings: &ReminderSettings, dry_run: bool) -> Result<()> {
    let reminders = due_reminders(&db.tasks, Utc::now(), settings);
    if reminders.is_empty() {
        println!("No reminders.");
        return Ok(());
    }
    for r in &reminders {
        println!("[{}] {}", r.kind.label(), r.message);
    }
    if !dry_run {
        db.latch_reminders(&reminders);
        db.save(db_path)?;
    }
    Ok(())
}

/// Handle bulk commands.
pub fn cmd_bulk(db: &mut Database, db_path: &Path, action: BulkAction) -> Result<()> {
    let now = Utc::now();
    match action {
        BulkAction::Complete { ids } => {
            let ids = resolve_all(&ids, db)?;
            let n = db.complete_many(&ids, now);
            db.save(db_path)?;
            println!("Marked {} task(s) done.", n);
        }
        BulkAction::Delete { ids } => {
            let ids = resolve_all(&ids, db)?;
            let n = db.delete_many(&ids);
            db.save(db_path)?;
            println!("Deleted {} task(s).", n);
        }
        BulkAction::Category { name, ids } => {
            let ids = resolve_all(&ids, db)?;
            warn_unknown_category(db, name.as_deref());
            let n = db.set_category_many(&ids, name, now);
            db.save(db_path)?;
            println!("Updated category on {} task(s).", n);
        }
        BulkAction::Export { output, ids } => {
            let ids = resolve_all(&ids, db)?;
            let export = db.export_tasks(&ids, now);
            let data = serde_json::to_string_pretty(&export)?;
            match output {
                Some(path) => {
                    let path = if path.is_dir() { path.join(export.file_name()) } else { path };
                    std::fs::write(&path, data)?;
                    println!("Exported {} task(s) to {}", export.total_tasks, path.display());
                }
                None => println!("{data}"),
            }
        }
    }
    Ok(())
}

/// Drop all data after confirmation.
pub fn cmd_clear(db: &mut Database, db_path: &Path, yes: bool) -> Result<()> {
    if !yes {
        println!("This deletes {} task(s). Re-run with --yes to confirm.", db.tasks.len());
        return Ok(());
    }
    db.clear();
    db.save(db_path)?;
    println!("Cleared.");
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Build filter criteria from list flags. `--category all` places no
/// category constraint (see [`FilterCriteria::category_constraint`]).
pub fn criteria(
    priority: Option<Priority>,
    status: StatusFilter,
    category: Option<String>,
    search: Option<String>,
) -> FilterCriteria {
    FilterCriteria {
        priority,
        status,
        category,
        search_term: search,
    }
}

/// Print tasks in a formatted table with optional tree indentation.
pub fn print_table(rows: &[(usize, &Task)], now: DateTime<Utc>) {
    println!(
        "{:<9} {:<8} {:<7} {:<11} {:<12} {}",
        "ID", "Status", "Pri", "Due", "Category", "Title"
    );
    for (depth, t) in rows {
        let due = if t.due_date.is_some() && t.due_at().is_none() {
            "?".to_string()
        } else {
            format_due_relative(t.due_at(), now)
        };
        let category = t.category.clone().unwrap_or_else(|| "-".into());
        println!(
            "{:<9} {:<8} {:<7} {:<11} {:<12} {}{}",
            short_id(&t.id),
            format_status(t.status()),
            format_priority(t.priority),
            due,
            truncate(&category, 12),
            "  ".repeat(*depth),
            t.title,
        );
    }
}

/// Format a due time relative to now ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = (d.date_naive() - now.date_naive()).num_days();
            if d < now && days == 0 {
                "due".into()
            } else if days == 0 {
                "today".into()
            } else if days == 1 {
                "tomorrow".into()
            } else if days > 1 {
                format!("in {}d", days)
            } else {
                format!("{}d late", -days)
            }
        }
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Horizontal bar of `value / max` scaled to `width` cells.
fn bar(value: usize, max: usize, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    "#".repeat(value.min(max) * width / max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_due_relative() {
        assert_eq!(format_due_relative(None, now()), "-");
        assert_eq!(format_due_relative(Some(now() + Duration::hours(3)), now()), "today");
        assert_eq!(format_due_relative(Some(now() - Duration::hours(3)), now()), "due");
        assert_eq!(format_due_relative(Some(now() + Duration::days(1)), now()), "tomorrow");
        assert_eq!(format_due_relative(Some(now() + Duration::days(4)), now()), "in 4d");
        assert_eq!(format_due_relative(Some(now() - Duration::days(2)), now()), "2d late");
    }

    #[test]
    fn test_criteria_all_category_is_unconstrained() {
        let c = criteria(None, StatusFilter::All, Some("all".into()), None);
        assert_eq!(c.category_constraint(), None);
        let c = criteria(None, StatusFilter::All, Some("".into()), None);
        assert_eq!(c.category_constraint(), None);
        let c = criteria(None, StatusFilter::All, Some("Work".into()), None);
        assert_eq!(c.category_constraint(), Some("Work"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long category", 6), "a lon…");
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(5, 10, 20), "#".repeat(10));
        assert_eq!(bar(3, 0, 20), "");
        assert_eq!(bar(12, 10, 10), "#".repeat(10));
    }

    #[test]
    fn test_validate_due_rejects_garbage() {
        assert_eq!(validate_due(" 2024-07-20 ").unwrap(), "2024-07-20");
        assert!(matches!(validate_due("soon"), Err(TodoError::InvalidDate { .. })));
        assert!(parse_day("2024-13-01").is_err());
    }

    #[test]
    fn test_oversized_windows_are_rejected() {
        let db = Database::default();
        assert!(matches!(
            cmd_timeline(&db, None, Some("2024-01-01".into()), u32::MAX, true),
            Err(TodoError::InvalidRange(_))
        ));
        assert!(matches!(cmd_trend(&db, u32::MAX), Err(TodoError::InvalidRange(_))));
        assert!(cmd_timeline(&db, None, Some("2024-01-01".into()), 3, true).is_ok());
    }

    #[test]
    fn test_add_and_update_through_commands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let mut db = Database::default();

        cmd_add(&mut db, &path, "Parent".into(), "2024-08-01".into(), None, Priority::High, Some("Work".into()), None)
            .unwrap();
        cmd_add(&mut db, &path, "Child".into(), "2024-08-02".into(), None, Priority::Low, None, Some("Parent".into()))
            .unwrap();
        assert!(matches!(
            cmd_add(&mut db, &path, "  ".into(), "2024-08-02".into(), None, Priority::Low, None, None),
            Err(TodoError::EmptyTitle)
        ));

        let parent_id = db.tasks[0].id.clone();
        assert_eq!(db.tasks[1].parent_id.as_deref(), Some(parent_id.as_str()));

        // Placing the parent under its own child is refused.
        let err = cmd_update(
            &mut db, &path, "Parent".into(), None, None, None, None, None,
            Some("Child".into()), false, false, false, false,
        )
        .unwrap_err();
        assert!(matches!(err, TodoError::ParentCycle { .. }));

        cmd_set_status(&mut db, &path, "Child".into(), Status::Completed).unwrap();
        let reloaded = Database::load(&path);
        assert!(reloaded.tasks[1].is_completed());
        assert_eq!(reloaded.tasks[0].category.as_deref(), Some("Work"));
    }
}
