use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// File-backed to-do list with task trees, reminders and analytics.
/// Storage defaults to ~/.todo/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "todo", version, about = "To-do list with hierarchy and analytics")]
pub struct Cli {
    /// Path to the JSON database file.
    #[arg(long, global = true, env = "TODO_DB")]
    pub db: Option<PathBuf>,

    /// Days before the due date at which an "upcoming" reminder fires.
    #[arg(long, global = true, env = "TODO_UPCOMING_DAYS", default_value_t = 3)]
    pub upcoming_days: i64,

    /// Days before the due date at which a "warning" reminder fires.
    #[arg(long, global = true, env = "TODO_WARNING_DAYS", default_value_t = 1)]
    pub warning_days: i64,

    #[command(subcommand)]
    pub command: Commands,
}
