//! Vacancy crawler: extracts structured job-listing records from djinni.co
//!
//! This crate walks the paginated Python vacancy listing, follows every
//! vacancy link and turns each detail page into a [`VacancyRecord`].

pub mod config;
pub mod crawler;
pub mod document;
pub mod extract;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Record extraction errors
///
/// Both variants are fatal to the single record being extracted and carry the
/// source URL and the failing field so the crawl loop can log and skip it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Missing required field '{field}' on {url}")]
    MissingRequiredField { field: extract::Field, url: String },

    #[error("Unparseable value for '{field}' on {url}: {value:?}")]
    UnparseableValue {
        field: extract::Field,
        url: String,
        value: String,
    },
}

impl ExtractError {
    /// Returns the field that caused the failure
    pub fn field(&self) -> extract::Field {
        match self {
            Self::MissingRequiredField { field, .. } | Self::UnparseableValue { field, .. } => {
                *field
            }
        }
    }

    /// Returns the URL of the page the failure happened on
    pub fn url(&self) -> &str {
        match self {
            Self::MissingRequiredField { url, .. } | Self::UnparseableValue { url, .. } => url,
        }
    }
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

// Re-export commonly used types
pub use config::Config;
pub use document::{Document, HtmlDocument};
pub use extract::{discover_links, Field, ListingLinks, RecordExtractor, VacancyRecord, Vocabulary};
pub use state::PageState;
