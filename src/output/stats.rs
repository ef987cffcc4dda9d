//! Statistics generation from crawl database
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::state::PageState;
use crate::storage::{RunRecord, Storage, StorageResult};
use std::collections::{BTreeMap, HashMap};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Most recent crawl run, if any
    pub latest_run: Option<RunRecord>,

    /// Total number of recorded pages
    pub total_pages: u64,

    /// Count of pages by state (states with zero pages omitted)
    pub pages_by_state: BTreeMap<PageState, u64>,

    /// Number of stored vacancy records
    pub vacancies: u64,

    /// Extraction failures keyed by field name
    pub failures_by_field: HashMap<String, u64>,
}

impl CrawlStatistics {
    /// Count for one state, zero if absent
    pub fn pages_in(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    pub fn total_failures(&self) -> u64 {
        self.failures_by_field.values().sum()
    }
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> StorageResult<CrawlStatistics> {
    let mut pages_by_state = BTreeMap::new();
    for state in PageState::all_states() {
        let count = storage.count_pages_by_state(state)?;
        if count > 0 {
            pages_by_state.insert(state, count);
        }
    }

    Ok(CrawlStatistics {
        latest_run: storage.get_latest_run()?,
        total_pages: storage.count_total_pages()?,
        pages_by_state,
        vacancies: storage.count_vacancies()?,
        failures_by_field: storage.get_failure_summary()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    if let Some(run) = &stats.latest_run {
        println!("Latest run: #{} ({})", run.id, run.status.to_db_string());
        println!("  Started:  {}", run.started_at);
        if let Some(finished) = &run.finished_at {
            println!("  Finished: {}", finished);
        }
        if let Some(duration) = run.duration() {
            println!("  Duration: {}s", duration.num_seconds());
        }
        println!();
    }

    println!("Overview:");
    println!("  Pages recorded: {}", stats.total_pages);
    println!("  Vacancies stored: {}", stats.vacancies);
    println!("  Extraction failures: {}", stats.total_failures());
    println!();

    println!("Pages by State:");
    for (state, count) in &stats.pages_by_state {
        let percentage = if stats.total_pages > 0 {
            (*count as f64 / stats.total_pages as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    if !stats.failures_by_field.is_empty() {
        println!("Failures by Field:");
        let mut failure_counts: Vec<_> = stats.failures_by_field.iter().collect();
        failure_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (field, count) in failure_counts {
            println!("  {}: {}", field, count);
        }
        println!();
    }

    let details = stats.pages_in(PageState::Extracted) + stats.pages_in(PageState::ExtractionFailed);
    let success_rate = if details > 0 {
        (stats.pages_in(PageState::Extracted) as f64 / details as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Extraction Rate: {:.1}% ({} / {} detail pages)",
        success_rate,
        stats.pages_in(PageState::Extracted),
        details
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Field;
    use crate::state::PageKind;
    use crate::storage::SqliteStorage;
    use crate::ExtractError;

    #[test]
    fn test_load_statistics_empty() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let stats = load_statistics(&storage).unwrap();

        assert!(stats.latest_run.is_none());
        assert_eq!(stats.total_pages, 0);
        assert!(stats.pages_by_state.is_empty());
        assert_eq!(stats.total_failures(), 0);
    }

    #[test]
    fn test_load_statistics_counts() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("hash").unwrap();

        storage
            .record_page(run_id, "https://djinni.co/jobs/", PageKind::Listing, PageState::Listed, Some(200), None)
            .unwrap();
        storage
            .record_page(run_id, "https://djinni.co/jobs/1/", PageKind::Detail, PageState::Extracted, Some(200), None)
            .unwrap();
        storage
            .record_page(run_id, "https://djinni.co/jobs/2/", PageKind::Detail, PageState::ExtractionFailed, Some(200), None)
            .unwrap();
        storage
            .record_failure(
                run_id,
                &ExtractError::MissingRequiredField {
                    field: Field::Company,
                    url: "https://djinni.co/jobs/2/".to_string(),
                },
            )
            .unwrap();

        let stats = load_statistics(&storage).unwrap();
        assert_eq!(stats.latest_run.as_ref().map(|r| r.id), Some(run_id));
        assert_eq!(stats.total_pages, 3);
        assert_eq!(stats.pages_in(PageState::Listed), 1);
        assert_eq!(stats.pages_in(PageState::Extracted), 1);
        assert_eq!(stats.pages_in(PageState::DeadLink), 0);
        assert_eq!(stats.failures_by_field.get("company"), Some(&1));
        assert_eq!(stats.total_failures(), 1);
    }
}
