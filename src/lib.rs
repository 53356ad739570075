//! # todo - To-do list with hierarchy and analytics
//!
//! A file-backed to-do list whose core is a set of pure transformations over
//! a snapshot of tasks. The store hands out `Vec<Task>` snapshots; everything
//! derived from them is recomputed on every call.
//!
//! ## Key Features
//!
//! - **Task Trees**: parent references rebuilt into a forest (`hierarchy`), with
//!   dangling parents promoted to roots and parent cycles left unreachable
//! - **Statistics**: totals, completion rate, overdue / due-in-24h counts and
//!   category and priority distributions (`stats`)
//! - **Timeline**: per-day pending and completed counts over a date range (`timeline`)
//! - **Filtering**: priority, status, category and free-text search combined with AND (`filter`)
//! - **Reminders**: overdue / warning / upcoming classes, each fired once per task (`reminder`)
//! - **Local File Storage**: a single JSON file with atomic saves (`db`)
//!
//! ## Quick Start
//!
//! ```bash
//! todo add "Quarterly report" --due 2024-07-01 --priority high --category Work
//! todo add "Collect numbers" --due 2024-06-28 --parent "Quarterly report"
//! todo list --tree
//! todo stats
//! todo timeline --days 14
//! todo remind
//! ```
//!
//! Day boundaries are UTC calendar dates throughout.

pub mod cli;
pub mod cmd;
pub mod config;
pub mod db;
pub mod error;
pub mod fields;
pub mod filter;
pub mod hierarchy;
pub mod reminder;
pub mod stats;
pub mod task;
pub mod timeline;

pub use error::{Result, TodoError};
