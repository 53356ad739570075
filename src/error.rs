//! Error types for the store and command layers.
//!
//! The analytics core never fails; only loading, mutating and the CLI input
//! layer surface these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Task '{id}' not found")]
    TaskNotFound { id: String },

    #[error("Category '{name}' already exists")]
    CategoryExists { name: String },

    #[error("Category '{name}' not found")]
    CategoryNotFound { name: String },

    #[error("Error resolving task: {0}")]
    Resolve(String),

    #[error("Task '{id}' cannot be placed under '{parent}': that would create a cycle")]
    ParentCycle { id: String, parent: String },

    #[error("Please enter a task title")]
    EmptyTitle,

    #[error("Please enter a category name")]
    EmptyCategoryName,

    #[error("Invalid date '{input}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM")]
    InvalidDate { input: String },

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TodoError>;
