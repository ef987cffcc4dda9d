//! Storage traits and error types

use crate::extract::VacancyRecord;
use crate::state::{PageKind, PageState};
use crate::storage::{RunRecord, RunStatus};
use crate::ExtractError;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run and returns its ID
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run as finished with the given status
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    // ===== Pages =====

    /// Records the outcome of a crawled URL, replacing any earlier outcome
    /// for the same URL within the run
    fn record_page(
        &mut self,
        run_id: i64,
        url: &str,
        kind: PageKind,
        state: PageState,
        status_code: Option<u16>,
        error_message: Option<&str>,
    ) -> StorageResult<()>;

    /// Recorded state of a URL within a run
    fn get_page_state(&self, run_id: i64, url: &str) -> StorageResult<Option<PageState>>;

    // ===== Vacancies =====

    /// Inserts or replaces a vacancy keyed by its URL
    fn save_vacancy(&mut self, run_id: i64, record: &VacancyRecord) -> StorageResult<()>;

    /// Loads every stored vacancy, newest publication first
    fn load_vacancies(&self) -> StorageResult<Vec<VacancyRecord>>;

    /// Records a failed extraction
    fn record_failure(&mut self, run_id: i64, error: &ExtractError) -> StorageResult<()>;

    // ===== Statistics =====

    /// Counts pages in a specific state
    fn count_pages_by_state(&self, state: PageState) -> StorageResult<u64>;

    /// Counts all recorded pages
    fn count_total_pages(&self) -> StorageResult<u64>;

    /// Counts stored vacancies
    fn count_vacancies(&self) -> StorageResult<u64>;

    /// Failure counts keyed by field name
    fn get_failure_summary(&self) -> StorageResult<HashMap<String, u64>>;
}
