//! Runtime configuration resolved from command-line flags and environment.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::Cli;
use crate::error::{Result, TodoError};
use crate::reminder::ReminderSettings;

/// Directory under `$HOME` holding the default store.
pub const DATA_DIR: &str = ".todo";
pub const DB_FILE: &str = "tasks.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub reminders: ReminderSettings,
}

impl Config {
    /// Resolve the store path and reminder thresholds. Creates the data
    /// directory when falling back to the default location.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let db_path = match cli.db.as_ref() {
            Some(p) => p.clone(),
            None => {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                default_db_path(Path::new(&home))?
            }
        };
        if cli.warning_days < 0 || cli.upcoming_days < cli.warning_days {
            return Err(TodoError::InvalidRange(format!(
                "need 0 <= warning days ({}) <= upcoming days ({})",
                cli.warning_days, cli.upcoming_days
            )));
        }
        let reminders = ReminderSettings {
            upcoming_days: cli.upcoming_days,
            warning_days: cli.warning_days,
        };
        debug!(db = %db_path.display(), ?reminders, "configuration resolved");
        Ok(Config { db_path, reminders })
    }
}

/// `<home>/.todo/tasks.json`, creating `<home>/.todo` if needed.
pub fn default_db_path(home: &Path) -> Result<PathBuf> {
    let dir = home.join(DATA_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join(DB_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_db_path_creates_dir() {
        let home = tempfile::tempdir().unwrap();
        let path = default_db_path(home.path()).unwrap();
        assert_eq!(path, home.path().join(".todo").join("tasks.json"));
        assert!(home.path().join(".todo").is_dir());
    }

    #[test]
    fn test_explicit_db_and_thresholds() {
        let cli = Cli::try_parse_from([
            "todo",
            "--db",
            "/tmp/elsewhere.json",
            "--upcoming-days",
            "5",
            "category",
            "list",
        ])
        .unwrap();
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/elsewhere.json"));
        assert_eq!(config.reminders.upcoming_days, 5);
        assert_eq!(config.reminders.warning_days, 1);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let cli = Cli::try_parse_from([
            "todo",
            "--db",
            "/tmp/elsewhere.json",
            "--upcoming-days",
            "1",
            "--warning-days",
            "2",
            "remind",
        ])
        .unwrap();
        assert!(matches!(Config::from_cli(&cli), Err(TodoError::InvalidRange(_))));
    }
}
