//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Classifying failures into page states
//!
//! Failed requests are not retried; the outcome is recorded and the crawl
//! moves on.

use crate::config::UserAgentConfig;
use crate::state::PageState;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// HTTP status code
        status_code: u16,
        /// The actual Content-Type received
        content_type: String,
    },

    /// HTTP error that maps to a specific page state
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// The page state this error maps to
        state: PageState,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// The page state this error maps to
        state: PageState,
    },
}

impl FetchResult {
    /// The page state this result is recorded as, if it is a failure
    pub fn failure_state(&self) -> Option<PageState> {
        match self {
            Self::Success { .. } => None,
            Self::ContentMismatch { .. } => Some(PageState::ContentMismatch),
            Self::HttpError { state, .. } | Self::NetworkError { state, .. } => Some(*state),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use vacancy_crawler::config::UserAgentConfig;
/// use vacancy_crawler::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "VacancyCrawler".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Format: CrawlerName/Version (+ContactURL; ContactEmail)
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with `text/html` | Success |
/// | 2xx with any other Content-Type | ContentMismatch |
/// | HTTP 404 / 410 | DeadLink |
/// | HTTP 429 | RateLimited |
/// | Other HTTP status | Failed |
/// | Timeout / connection refused | Unreachable |
/// | Anything else | Failed |
pub async fn fetch_page(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return classify_network_error(&e),
    };

    let status = response.status();
    let final_url = response.url().clone();

    if let Some(state) = state_for_status(status) {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
            state,
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.to_ascii_lowercase().contains("text/html") {
        return FetchResult::ContentMismatch {
            status_code: status.as_u16(),
            content_type,
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => classify_network_error(&e),
    }
}

fn state_for_status(status: StatusCode) -> Option<PageState> {
    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => Some(PageState::DeadLink),
        StatusCode::TOO_MANY_REQUESTS => Some(PageState::RateLimited),
        s if s.is_success() => None,
        _ => Some(PageState::Failed),
    }
}

fn classify_network_error(e: &reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            state: PageState::Unreachable,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            state: PageState::Unreachable,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            state: PageState::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    async fn fetch(server: &MockServer, route: &str) -> FetchResult {
        let client = build_http_client(&create_test_config()).unwrap();
        let url = Url::parse(&format!("{}{}", server.uri(), route)).unwrap();
        fetch_page(&client, &url).await
    }

    #[test]
    fn test_user_agent_format() {
        assert_eq!(
            user_agent_string(&create_test_config()),
            "TestCrawler/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(state_for_status(StatusCode::OK), None);
        assert_eq!(state_for_status(StatusCode::NOT_FOUND), Some(PageState::DeadLink));
        assert_eq!(state_for_status(StatusCode::GONE), Some(PageState::DeadLink));
        assert_eq!(
            state_for_status(StatusCode::TOO_MANY_REQUESTS),
            Some(PageState::RateLimited)
        );
        assert_eq!(
            state_for_status(StatusCode::INTERNAL_SERVER_ERROR),
            Some(PageState::Failed)
        );
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><h1>Jobs</h1></html>", "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        match fetch(&server, "/jobs/").await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                assert_eq!(status_code, 200);
                assert_eq!(final_url.path(), "/jobs/");
                assert!(body.contains("<h1>Jobs</h1>"));
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_classifies_failures() {
        let server = MockServer::start().await;
        Mock::given(path("/gone/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(path("/slow-down/"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        Mock::given(path("/feed.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
            .mount(&server)
            .await;

        assert_eq!(
            fetch(&server, "/gone/").await.failure_state(),
            Some(PageState::DeadLink)
        );
        assert_eq!(
            fetch(&server, "/slow-down/").await.failure_state(),
            Some(PageState::RateLimited)
        );
        assert!(matches!(
            fetch(&server, "/feed.json").await,
            FetchResult::ContentMismatch { status_code: 200, .. }
        ));
    }

    #[tokio::test]
    async fn test_fetch_unreachable() {
        let client = build_http_client(&create_test_config()).unwrap();
        // Port 9 (discard) is closed on test machines
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        assert_eq!(
            fetch_page(&client, &url).await.failure_state(),
            Some(PageState::Unreachable)
        );
    }
}
