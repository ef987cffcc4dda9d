//! Link discovery for listing pages

use crate::document::Document;
use url::Url;

const VACANCY_LINK: &str = ".job-list-item__link";
const NEXT_PAGE_LINK: &str = ".pagination > li:last-child > a";

/// Links found on one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingLinks {
    /// Vacancy detail pages, in document order
    pub vacancies: Vec<Url>,

    /// The next listing page; `None` ends pagination
    pub next_page: Option<Url>,
}

impl ListingLinks {
    /// Returns true if the page led nowhere
    pub fn is_empty(&self) -> bool {
        self.vacancies.is_empty() && self.next_page.is_none()
    }
}

/// Collects vacancy links and the next-page link from a listing page
///
/// Relative hrefs are resolved against the document URL. Pages that lack the
/// expected markup produce an empty result rather than an error.
///
/// # Example
///
/// ```
/// use url::Url;
/// use vacancy_crawler::document::HtmlDocument;
/// use vacancy_crawler::extract::discover_links;
///
/// let html = r#"<a class="job-list-item__link" href="/jobs/42-python/">Python</a>"#;
/// let doc = HtmlDocument::parse(Url::parse("https://djinni.co/jobs/").unwrap(), html);
/// let links = discover_links(&doc);
/// assert_eq!(links.vacancies[0].as_str(), "https://djinni.co/jobs/42-python/");
/// assert!(links.next_page.is_none());
/// ```
pub fn discover_links<D: Document + ?Sized>(document: &D) -> ListingLinks {
    let base_url = document.url();

    let vacancies = document
        .select_attr(VACANCY_LINK, "href")
        .iter()
        .filter_map(|href| resolve_link(href, base_url))
        .collect();

    let next_page = document
        .select_attr(NEXT_PAGE_LINK, "href")
        .first()
        .and_then(|href| resolve_link(href, base_url));

    ListingLinks {
        vacancies,
        next_page,
    }
}

/// Resolves an href to an absolute HTTP(S) URL
///
/// Returns None for empty hrefs, fragment-only anchors, `javascript:` and
/// similar schemes, and anything that fails to join.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url)
        }
        Ok(absolute_url) => {
            tracing::debug!("Skipping non-HTTP link {}", absolute_url);
            None
        }
        Err(e) => {
            tracing::debug!("Failed to resolve link {:?}: {}", href, e);
            None
        }
    }
}
