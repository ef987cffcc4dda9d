//! Output module for extracted records and crawl reports
//!
//! This module handles:
//! - Sinks that receive every extracted vacancy record during a crawl
//! - Exporting stored vacancies as JSON Lines
//! - Loading and printing crawl statistics

mod jsonl;
pub mod stats;

pub use jsonl::{export_jsonl, JsonLinesSink};
pub use stats::{load_statistics, print_statistics, CrawlStatistics};

use crate::extract::VacancyRecord;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Receives every successfully extracted record
///
/// The crawl database always stores records; sinks are additional
/// destinations configured per run.
pub trait RecordSink {
    /// Accepts one record
    fn accept(&mut self, record: &VacancyRecord) -> OutputResult<()>;

    /// Flushes buffered records; called once when the crawl ends
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}
