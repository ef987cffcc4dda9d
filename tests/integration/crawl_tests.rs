//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing and vacancy pages and run the
//! full crawl cycle end-to-end against a temporary database.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use vacancy_crawler::config::{
    Config, CrawlerConfig, OutputConfig, UserAgentConfig, VocabularyConfig,
};
use vacancy_crawler::crawler::Coordinator;
use vacancy_crawler::output::{JsonLinesSink, RecordSink};
use vacancy_crawler::state::PageState;
use vacancy_crawler::storage::{RunStatus, SqliteStorage, Storage};
use vacancy_crawler::VacancyRecord;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling from the mock server's listing
fn create_test_config(start_url: String, allowed_domain: &str, db_path: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            start_urls: vec![start_url],
            allowed_domains: vec![allowed_domain.to_string()],
            max_pages: 0,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            database_path: db_path.to_string(),
            jsonl_path: None,
        },
        vocabulary: VocabularyConfig::default(),
    }
}

fn listing_page(vacancy_hrefs: &[&str], next_href: Option<&str>) -> String {
    let items: String = vacancy_hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<li class="list-jobs__item"><a class="job-list-item__link" href="{}">Python</a></li>"#,
                href
            )
        })
        .collect();

    let pagination = match next_href {
        Some(href) => format!(
            r#"<ul class="pagination">
                 <li class="page-item active"><span>1</span></li>
                 <li class="page-item"><a class="page-link" href="{}">Next</a></li>
               </ul>"#,
            href
        ),
        None => r#"<ul class="pagination"><li class="page-item disabled"><span>Next</span></li></ul>"#
            .to_string(),
    };

    format!("<html><body><ul>{}</ul>{}</body></html>", items, pagination)
}

fn detail_page(title: &str, experience: &str) -> String {
    format!(
        r#"<html><body>
        <h1>{title} <span class="public-salary-item">$2500-3500</span></h1>
        <a class="job-details--title" href="/jobs/?company=acme">Acme</a>
        <div class="row-mobile-order-2"><div class="mb-4">We use Python, FastAPI and Docker.</div></div>
        <ul>
          <li><div>Англійська: Intermediate</div></li>
          {experience}
          <li><span class="bi bi-building"></span><div>Office</div></li>
          <li><span class="location-text">Україна, Польща</span></li>
        </ul>
        <p class="text-muted">Вакансія опублікована 12 вересня 2023</p>
        <p class="text-muted"><span>40 переглядів</span> <span>3 відгуки</span></p>
        </body></html>"#
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_listing_details_and_pagination() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let host = url::Url::parse(&base_url)
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string();

    // Page 2 of the listing; mounted first so the query matcher takes priority
    Mock::given(method("GET"))
        .and(path("/jobs/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            listing_page(&["/jobs/3-python-dev/", "/jobs/1-python-dev/"], None),
            "text/html; charset=utf-8",
        ))
        .mount(&mock_server)
        .await;

    mount_html(
        &mock_server,
        "/jobs/",
        listing_page(
            &[
                "/jobs/1-python-dev/",
                "/jobs/2-broken/#apply",
                "https://offsite.example.org/jobs/9/",
            ],
            Some("/jobs/?page=2"),
        ),
    )
    .await;

    mount_html(
        &mock_server,
        "/jobs/1-python-dev/",
        detail_page("Python Developer", "<li><div>2 роки досвіду</div></li>"),
    )
    .await;
    // No experience block: required field missing
    mount_html(&mock_server, "/jobs/2-broken/", detail_page("Broken Vacancy", "")).await;
    mount_html(
        &mock_server,
        "/jobs/3-python-dev/",
        detail_page("Junior Python Developer", "<li><div>Без досвіду</div></li>"),
    )
    .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawl.db");
    let config = create_test_config(
        format!("{}/jobs/", base_url),
        &host,
        db_path.to_str().unwrap(),
    );

    let storage = SqliteStorage::new(&db_path).unwrap();
    let mut coordinator = Coordinator::new(config, "test-hash", storage, Vec::new()).unwrap();
    let summary = coordinator.run().await.expect("Crawl failed");

    // 2 listing pages + 3 unique detail pages; the repeated link is fetched once
    assert_eq!(summary.pages_fetched, 5);
    assert_eq!(summary.vacancies_extracted, 2);
    assert_eq!(summary.extraction_failures, 1);
    assert_eq!(summary.offsite_skipped, 1);

    let storage = coordinator.into_storage();
    assert_eq!(storage.count_pages_by_state(PageState::Listed).unwrap(), 2);
    assert_eq!(storage.count_pages_by_state(PageState::Extracted).unwrap(), 2);
    assert_eq!(
        storage
            .count_pages_by_state(PageState::ExtractionFailed)
            .unwrap(),
        1
    );
    assert_eq!(storage.count_pages_by_state(PageState::Offsite).unwrap(), 1);
    assert_eq!(storage.count_vacancies().unwrap(), 2);

    let failures = storage.get_failure_summary().unwrap();
    assert_eq!(failures.get("experience_years"), Some(&1));

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "test-hash");

    let records = storage.load_vacancies().unwrap();
    let junior = records
        .iter()
        .find(|r| r.title == "Junior Python Developer")
        .expect("Junior vacancy stored");
    assert_eq!(junior.experience_years, 0);
    assert_eq!(junior.salary, Some(vec![2500, 3500]));
    assert_eq!(junior.english_level, "Intermediate");
    assert_eq!(junior.country, vec!["Україна", "Польща"]);
    assert_eq!(junior.technologies, vec!["Python", "FastAPI", "Docker"]);
    assert_eq!(junior.views_count, 40);
    assert_eq!(junior.applicant_count, 3);
    assert_eq!(junior.publication_date.to_string(), "2023-09-12");
}

#[tokio::test]
async fn test_dead_links_and_max_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/jobs/",
        listing_page(&["/jobs/404/", "/jobs/1-python-dev/"], None),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/jobs/404/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/jobs/1-python-dev/",
        detail_page("Python Developer", "<li><div>1 рік досвіду</div></li>"),
    )
    .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawl.db");
    let mut config = create_test_config(
        format!("{}/jobs/", base_url),
        "127.0.0.1",
        db_path.to_str().unwrap(),
    );
    config.crawler.max_pages = 2;

    let storage = SqliteStorage::new(&db_path).unwrap();
    let mut coordinator = Coordinator::new(config, "hash", storage, Vec::new()).unwrap();
    let summary = coordinator.run().await.unwrap();

    // Listing + the dead link; the cap stops before the last detail page
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.vacancies_extracted, 0);

    let storage = coordinator.into_storage();
    assert_eq!(storage.count_pages_by_state(PageState::DeadLink).unwrap(), 1);
    assert_eq!(storage.count_total_pages().unwrap(), 2);
}

/// Sink that shares its buffer with the test
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_records_reach_jsonl_sink() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/jobs/",
        listing_page(&["/jobs/1-python-dev/"], None),
    )
    .await;
    mount_html(
        &mock_server,
        "/jobs/1-python-dev/",
        detail_page("Python Developer", "<li><div>5 років досвіду</div></li>"),
    )
    .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawl.db");
    let config = create_test_config(
        format!("{}/jobs/", base_url),
        "127.0.0.1",
        db_path.to_str().unwrap(),
    );

    let buffer = Rc::new(RefCell::new(Vec::new()));
    let sinks: Vec<Box<dyn RecordSink>> =
        vec![Box::new(JsonLinesSink::new(SharedBuffer(buffer.clone())))];

    let storage = SqliteStorage::new(&db_path).unwrap();
    let mut coordinator = Coordinator::new(config, "hash", storage, sinks).unwrap();
    coordinator.run().await.unwrap();

    let output = String::from_utf8(buffer.borrow().clone()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 1);

    let record: VacancyRecord = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(record.title, "Python Developer");
    assert_eq!(record.experience_years, 5);
    assert_eq!(record.url, format!("{}/jobs/1-python-dev/", base_url));
}

#[tokio::test]
async fn test_redirected_vacancy_keyed_by_final_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let final_url = format!("{}/jobs/1-python-dev/", base_url);

    mount_html(
        &mock_server,
        "/jobs/",
        listing_page(&["/jobs/1/", "/jobs/1-python-dev/"], None),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/jobs/1/"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", final_url.as_str()))
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/jobs/1-python-dev/",
        detail_page("Python Developer", "<li><div>2 роки досвіду</div></li>"),
    )
    .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawl.db");
    let config = create_test_config(
        format!("{}/jobs/", base_url),
        "127.0.0.1",
        db_path.to_str().unwrap(),
    );

    let storage = SqliteStorage::new(&db_path).unwrap();
    let mut coordinator = Coordinator::new(config, "hash", storage, Vec::new()).unwrap();
    let summary = coordinator.run().await.unwrap();

    // The redirect target is not fetched a second time under its own link
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.vacancies_extracted, 1);

    let storage = coordinator.into_storage();
    let records = storage.load_vacancies().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, final_url);
    assert_eq!(
        storage
            .get_page_state(summary.run_id, &records[0].url)
            .unwrap(),
        Some(PageState::Extracted)
    );
    assert_eq!(
        storage
            .get_page_state(summary.run_id, &format!("{}/jobs/1/", base_url))
            .unwrap(),
        None
    );
}
