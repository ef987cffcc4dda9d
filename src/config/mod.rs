//! Configuration module for the vacancy crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use vacancy_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Starting from: {:?}", config.crawler.start_urls);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, VocabularyConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
