use crate::extract::{Vocabulary, DEFAULT_MONTHS, DEFAULT_TECHNOLOGIES};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for the vacancy crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

/// Crawl entry points and scope
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Listing pages the crawl starts from
    #[serde(rename = "start-urls")]
    pub start_urls: Vec<String>,

    /// Domain patterns the crawl may visit (e.g. "djinni.co" or "*.djinni.co").
    /// Empty means any domain.
    #[serde(rename = "allowed-domains", default)]
    pub allowed_domains: Vec<String>,

    /// Maximum number of pages to fetch; 0 means no limit
    #[serde(rename = "max-pages", default)]
    pub max_pages: u32,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Optional JSON Lines file receiving every extracted record
    #[serde(rename = "jsonl-path", default)]
    pub jsonl_path: Option<String>,
}

/// Overrides for the built-in extraction vocabularies
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VocabularyConfig {
    /// Technology names, matched in the listed order
    #[serde(default)]
    pub technologies: Option<Vec<String>>,

    /// Localized month word to month number (1-12)
    #[serde(default)]
    pub months: Option<BTreeMap<String, u32>>,
}

impl VocabularyConfig {
    /// Builds the vocabulary, falling back to the built-in tables
    pub fn build(&self) -> Vocabulary {
        let technologies: Vec<String> = match &self.technologies {
            Some(list) => list.clone(),
            None => DEFAULT_TECHNOLOGIES.iter().map(|s| s.to_string()).collect(),
        };

        let months: Vec<(String, u32)> = match &self.months {
            Some(table) => table.iter().map(|(word, n)| (word.clone(), *n)).collect(),
            None => DEFAULT_MONTHS
                .iter()
                .map(|(word, n)| (word.to_string(), *n))
                .collect(),
        };

        Vocabulary::new(technologies, months)
    }
}
