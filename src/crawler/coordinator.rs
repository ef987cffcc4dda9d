//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop, which:
//! - Seeds a FIFO queue with the configured listing pages
//! - Fetches each page and classifies the outcome
//! - Follows vacancy and next-page links from listing pages
//! - Extracts a record from every vacancy page and hands it to the sinks
//! - Persists every page outcome and extraction failure

use crate::config::Config;
use crate::crawler::{build_http_client, fetch_page, FetchResult};
use crate::document::HtmlDocument;
use crate::extract::{discover_links, ListingLinks, RecordExtractor, VacancyRecord};
use crate::output::RecordSink;
use crate::state::{PageKind, PageState};
use crate::storage::{open_storage, RunStatus, Storage};
use crate::url::{canonicalize_url, extract_domain, is_allowed_domain};
use crate::{ExtractResult, Result};
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use url::Url;

/// A page waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub url: Url,
    pub kind: PageKind,
}

/// Totals for a finished crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub run_id: i64,
    pub pages_fetched: u32,
    pub vacancies_extracted: u32,
    pub extraction_failures: u32,
    pub offsite_skipped: u32,
}

/// Main crawler coordinator structure
pub struct Coordinator<S: Storage> {
    config: Config,
    storage: S,
    sinks: Vec<Box<dyn RecordSink>>,
    extractor: RecordExtractor,
    client: Client,
    queue: VecDeque<CrawlRequest>,
    seen: HashSet<String>,
    /// Canonical URLs already served, including redirect targets
    visited: HashSet<String>,
    summary: CrawlSummary,
}

impl<S: Storage> Coordinator<S> {
    /// Creates a coordinator and opens a new run in `storage`
    pub fn new(
        config: Config,
        config_hash: &str,
        mut storage: S,
        sinks: Vec<Box<dyn RecordSink>>,
    ) -> Result<Self> {
        let client = build_http_client(&config.user_agent)?;
        let extractor = RecordExtractor::new(config.vocabulary.build());
        let run_id = storage.create_run(config_hash)?;

        Ok(Self {
            config,
            storage,
            sinks,
            extractor,
            client,
            queue: VecDeque::new(),
            seen: HashSet::new(),
            visited: HashSet::new(),
            summary: CrawlSummary {
                run_id,
                ..CrawlSummary::default()
            },
        })
    }

    /// Gives the storage back, e.g. to query it after a crawl
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Runs the crawl to completion and marks the run finished
    pub async fn run(&mut self) -> Result<CrawlSummary> {
        let run_id = self.summary.run_id;
        tracing::info!("Starting crawl run {}", run_id);

        match self.crawl().await {
            Ok(()) => {
                self.storage.finish_run(run_id, RunStatus::Completed)?;
                tracing::info!(
                    "Crawl run {} complete: {} pages fetched, {} vacancies, {} extraction failures",
                    run_id,
                    self.summary.pages_fetched,
                    self.summary.vacancies_extracted,
                    self.summary.extraction_failures
                );
                Ok(self.summary.clone())
            }
            Err(e) => {
                tracing::error!("Crawl run {} failed: {}", run_id, e);
                if let Err(status_err) = self.storage.finish_run(run_id, RunStatus::Failed) {
                    tracing::error!("Could not mark run {} failed: {}", run_id, status_err);
                }
                Err(e)
            }
        }
    }

    async fn crawl(&mut self) -> Result<()> {
        let start_urls = self.config.crawler.start_urls.clone();
        for start_url in &start_urls {
            let url = canonicalize_url(start_url)?;
            self.enqueue(url, PageKind::Listing)?;
        }

        let max_pages = self.config.crawler.max_pages;
        let start_time = std::time::Instant::now();

        while let Some(request) = self.queue.pop_front() {
            if max_pages > 0 && self.summary.pages_fetched >= max_pages {
                tracing::info!(
                    "Reached max-pages limit of {}, leaving {} URLs unvisited",
                    max_pages,
                    self.queue.len() + 1
                );
                break;
            }

            if !self.visited.insert(request.url.to_string()) {
                tracing::debug!("Already served via redirect: {}", request.url);
                continue;
            }

            tracing::debug!("Fetching {} page: {}", request.kind, request.url);
            self.process(request).await?;
            self.summary.pages_fetched += 1;

            if self.summary.pages_fetched % 10 == 0 {
                let rate = self.summary.pages_fetched as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages fetched, {} queued, {:.2} pages/sec",
                    self.summary.pages_fetched,
                    self.queue.len(),
                    rate
                );
            }
        }

        for sink in &mut self.sinks {
            sink.finish()?;
        }

        Ok(())
    }

    /// Queues a URL unless it was already seen or lies outside the allowed domains
    fn enqueue(&mut self, url: Url, kind: PageKind) -> Result<()> {
        let url = canonicalize_url(url.as_str())?;
        if !self.seen.insert(url.to_string()) {
            return Ok(());
        }

        let allowed = extract_domain(&url)
            .map(|domain| is_allowed_domain(&domain, &self.config.crawler.allowed_domains))
            .unwrap_or(false);

        if !allowed {
            tracing::debug!("Skipping offsite URL {}", url);
            self.summary.offsite_skipped += 1;
            self.storage.record_page(
                self.summary.run_id,
                url.as_str(),
                kind,
                PageState::Offsite,
                None,
                None,
            )?;
            return Ok(());
        }

        self.queue.push_back(CrawlRequest { url, kind });
        Ok(())
    }

    async fn process(&mut self, request: CrawlRequest) -> Result<()> {
        let run_id = self.summary.run_id;
        let url_str = request.url.as_str();

        match fetch_page(&self.client, &request.url).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                // Pages and vacancies are keyed by where the page was served from
                let page_url = final_url.to_string();
                if page_url != url_str {
                    tracing::debug!("{} redirected to {}", url_str, page_url);
                    if let Ok(canonical) = canonicalize_url(&page_url) {
                        self.seen.insert(canonical.to_string());
                        self.visited.insert(canonical.to_string());
                    }
                }
                let url_str = page_url.as_str();

                match request.kind {
                    PageKind::Listing => {
                        let links = parse_listing(final_url, &body);
                        tracing::debug!(
                            "Listing {} has {} vacancies, next page: {}",
                            url_str,
                            links.vacancies.len(),
                            links.next_page.is_some()
                        );
                        self.storage.record_page(
                            run_id,
                            url_str,
                            PageKind::Listing,
                            PageState::Listed,
                            Some(status_code),
                            None,
                        )?;

                        for vacancy in links.vacancies {
                            self.enqueue(vacancy, PageKind::Detail)?;
                        }
                        if let Some(next_page) = links.next_page {
                            self.enqueue(next_page, PageKind::Listing)?;
                        }
                    }

                    PageKind::Detail => match parse_detail(&self.extractor, final_url, &body) {
                        Ok(record) => {
                            self.emit(&record)?;
                            self.storage.record_page(
                                run_id,
                                url_str,
                                PageKind::Detail,
                                PageState::Extracted,
                                Some(status_code),
                                None,
                            )?;
                        }
                        Err(e) => {
                            tracing::warn!(url = %e.url(), field = %e.field(), "Skipping vacancy: {}", e);
                            self.summary.extraction_failures += 1;
                            self.storage.record_failure(run_id, &e)?;
                            self.storage.record_page(
                                run_id,
                                url_str,
                                PageKind::Detail,
                                PageState::ExtractionFailed,
                                Some(status_code),
                                Some(&e.to_string()),
                            )?;
                        }
                    },
                }
            }

            FetchResult::ContentMismatch {
                status_code,
                content_type,
            } => {
                tracing::info!("Skipping {}: not HTML ({})", url_str, content_type);
                self.storage.record_page(
                    run_id,
                    url_str,
                    request.kind,
                    PageState::ContentMismatch,
                    Some(status_code),
                    Some(&format!("Expected HTML, got {}", content_type)),
                )?;
            }

            FetchResult::HttpError { status_code, state } => {
                tracing::warn!("HTTP {} for {}", status_code, url_str);
                self.storage.record_page(
                    run_id,
                    url_str,
                    request.kind,
                    state,
                    Some(status_code),
                    None,
                )?;
            }

            FetchResult::NetworkError { error, state } => {
                tracing::warn!("Failed to fetch {}: {}", url_str, error);
                self.storage
                    .record_page(run_id, url_str, request.kind, state, None, Some(&error))?;
            }
        }

        Ok(())
    }

    fn emit(&mut self, record: &VacancyRecord) -> Result<()> {
        self.storage.save_vacancy(self.summary.run_id, record)?;
        for sink in &mut self.sinks {
            sink.accept(record)?;
        }
        self.summary.vacancies_extracted += 1;
        tracing::debug!("Extracted vacancy '{}' at {}", record.title, record.url);
        Ok(())
    }
}

// The parsed tree is not Send, so it must never live across an await point.
fn parse_listing(url: Url, body: &str) -> ListingLinks {
    let document = HtmlDocument::parse(url, body);
    discover_links(&document)
}

fn parse_detail(extractor: &RecordExtractor, url: Url, body: &str) -> ExtractResult<VacancyRecord> {
    let document = HtmlDocument::parse(url, body);
    extractor.extract(&document)
}

/// Runs a complete crawl against the configured database and sinks
///
/// # Example
///
/// ```no_run
/// use vacancy_crawler::config::load_config_with_hash;
/// use vacancy_crawler::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("crawler.toml"))?;
/// let summary = run_crawl(config, &hash).await?;
/// println!("{} vacancies", summary.vacancies_extracted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, config_hash: &str) -> Result<CrawlSummary> {
    let storage = open_storage(Path::new(&config.output.database_path))?;

    let mut sinks: Vec<Box<dyn RecordSink>> = Vec::new();
    if let Some(jsonl_path) = &config.output.jsonl_path {
        tracing::info!("Writing records to {}", jsonl_path);
        sinks.push(Box::new(crate::output::JsonLinesSink::create(Path::new(
            jsonl_path,
        ))?));
    }

    let mut coordinator = Coordinator::new(config, config_hash, storage, sinks)?;
    coordinator.run().await
}
