//! Document query interface
//!
//! Extraction code never walks the DOM directly. It asks a [`Document`] for
//! text or attributes behind a CSS selector, which keeps the field rules
//! testable against synthetic fixtures and independent of the HTML library.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A parsed page that can be queried with CSS selectors
///
/// "Own text" means the direct text-node children of a matched element,
/// trimmed, with whitespace-only nodes skipped. Invalid selectors match
/// nothing.
pub trait Document {
    /// The URL the document was fetched from
    fn url(&self) -> &Url;

    /// Own text nodes of every element matching `selector`, in document order
    fn select_all(&self, selector: &str) -> Vec<String>;

    /// Full descendant text of every element matching `selector`
    fn select_text(&self, selector: &str) -> Vec<String>;

    /// Values of `attr` on every element matching `selector`
    fn select_attr(&self, selector: &str, attr: &str) -> Vec<String>;

    /// First own text node among the elements matching `selector`
    fn select_first(&self, selector: &str) -> Option<String> {
        self.select_all(selector).into_iter().next()
    }
}

/// [`Document`] backed by a `scraper` HTML tree
pub struct HtmlDocument {
    url: Url,
    html: Html,
}

impl HtmlDocument {
    /// Parses an HTML body fetched from `url`
    ///
    /// # Example
    ///
    /// ```
    /// use url::Url;
    /// use vacancy_crawler::document::{Document, HtmlDocument};
    ///
    /// let url = Url::parse("https://djinni.co/jobs/1/").unwrap();
    /// let doc = HtmlDocument::parse(url, "<h1> Senior Python </h1>");
    /// assert_eq!(doc.select_first("h1"), Some("Senior Python".to_string()));
    /// ```
    pub fn parse(url: Url, body: &str) -> Self {
        Self {
            url,
            html: Html::parse_document(body),
        }
    }

    fn elements<'a>(&'a self, selector: &str) -> Vec<ElementRef<'a>> {
        match Selector::parse(selector) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(e) => {
                tracing::debug!("Invalid selector {:?}: {:?}", selector, e);
                Vec::new()
            }
        }
    }
}

impl Document for HtmlDocument {
    fn url(&self) -> &Url {
        &self.url
    }

    fn select_all(&self, selector: &str) -> Vec<String> {
        self.elements(selector)
            .into_iter()
            .flat_map(|element| {
                element
                    .children()
                    .filter_map(|child| child.value().as_text().map(|text| text.trim().to_string()))
                    .collect::<Vec<_>>()
            })
            .filter(|text| !text.is_empty())
            .collect()
    }

    fn select_text(&self, selector: &str) -> Vec<String> {
        self.elements(selector)
            .into_iter()
            .map(|element| element.text().collect::<String>())
            .collect()
    }

    fn select_attr(&self, selector: &str, attr: &str) -> Vec<String> {
        self.elements(selector)
            .into_iter()
            .filter_map(|element| element.value().attr(attr).map(str::to_string))
            .collect()
    }
}
