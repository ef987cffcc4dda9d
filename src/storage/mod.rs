//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Crawl run tracking
//! - Per-URL outcome states
//! - Extracted vacancy records and extraction failures

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use chrono::DateTime;
use std::path::Path;

/// Initializes or opens a storage database
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// One crawl invocation, as stored in the `runs` table
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    /// RFC 3339 timestamp
    pub started_at: String,
    pub finished_at: Option<String>,
    /// SHA-256 of the config file the run was started with
    pub config_hash: String,
    pub status: RunStatus,
}

impl RunRecord {
    /// Wall-clock duration of a finished run
    pub fn duration(&self) -> Option<chrono::Duration> {
        let started = DateTime::parse_from_rfc3339(&self.started_at).ok()?;
        let finished = DateTime::parse_from_rfc3339(self.finished_at.as_deref()?).ok()?;
        Some(finished - started)
    }
}

/// Lifecycle of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Unknown strings read back as `None`
    pub fn from_db_string(s: &str) -> Option<Self> {
        [Self::Running, Self::Completed, Self::Failed]
            .into_iter()
            .find(|status| status.to_db_string() == s)
    }
}
