//! Crawler module for fetching and processing vacancy pages
//!
//! This module contains the crawl collaborator around the extraction core:
//! - HTTP fetching and outcome classification
//! - Overall crawl coordination (queueing, dedup, offsite filtering)

mod coordinator;
mod fetcher;

pub use coordinator::{run_crawl, Coordinator, CrawlRequest, CrawlSummary};
pub use fetcher::{build_http_client, fetch_page, user_agent_string, FetchResult};

use crate::config::Config;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the crawl database and create a run
/// 2. Build the HTTP client
/// 3. Walk the listing pages and their vacancies
/// 4. Store every record and page outcome
/// 5. Mark the run finished
pub async fn crawl(config: Config, config_hash: &str) -> crate::Result<CrawlSummary> {
    run_crawl(config, config_hash).await
}
