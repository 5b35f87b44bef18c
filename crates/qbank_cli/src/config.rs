//! Global CLI options and store/logging bootstrap.

use clap::Args;
use qbank_core::{init_logging, open_db, LogLevel, LoggingConfig, LoggingError};
use rusqlite::Connection;
use std::path::PathBuf;

const DEFAULT_DB_FILE: &str = "qbank.sqlite3";
const DEFAULT_LOG_DIR: &str = "qbank-logs";

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// SQLite database file
    #[arg(long, global = true, env = "QBANK_DB_PATH")]
    pub db: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true, env = "QBANK_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Directory for rolling log files (absolute path)
    #[arg(long, global = true, env = "QBANK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn db_path(&self) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR))
    }

    pub fn logging_config(&self) -> Result<LoggingConfig, LoggingError> {
        let level = self.log_level.unwrap_or_else(LogLevel::build_default);
        LoggingConfig::new(level, self.log_dir())
    }

    pub fn init_logging(&self) -> Result<(), LoggingError> {
        init_logging(&self.logging_config()?)
    }

    /// Opens the configured store with migrations applied.
    pub fn open_store(&self) -> Result<Connection, Box<dyn std::error::Error>> {
        let path = self.db_path();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(open_db(&path)?)
    }
}
