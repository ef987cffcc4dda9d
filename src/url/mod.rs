//! URL handling module
//!
//! This module provides domain extraction, wildcard matching against the
//! configured allowed domains, and URL canonicalization for request
//! deduplication.

mod domain;
mod matcher;
mod normalize;

pub use domain::extract_domain;
pub use matcher::matches_wildcard;
pub use normalize::canonicalize_url;

/// Checks a domain against the configured allowed-domain patterns
///
/// An empty pattern list allows every domain.
///
/// # Examples
///
/// ```
/// use vacancy_crawler::url::is_allowed_domain;
///
/// let allowed = vec!["djinni.co".to_string()];
/// assert!(is_allowed_domain("djinni.co", &allowed));
/// assert!(!is_allowed_domain("dou.ua", &allowed));
/// assert!(is_allowed_domain("dou.ua", &[]));
/// ```
pub fn is_allowed_domain(domain: &str, allowed: &[String]) -> bool {
    allowed.is_empty()
        || allowed
            .iter()
            .any(|pattern| matches_wildcard(&pattern.to_lowercase(), domain))
}
