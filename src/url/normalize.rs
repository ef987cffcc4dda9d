use crate::UrlError;
use url::Url;

/// Canonicalizes a URL for request deduplication
///
/// The fragment is dropped and query parameters are sorted, so
/// `?page=2&primary_keyword=Python` and `?primary_keyword=Python&page=2#x`
/// are the same request. Only HTTP(S) URLs with a host are accepted.
///
/// # Examples
///
/// ```
/// use vacancy_crawler::url::canonicalize_url;
///
/// let url = canonicalize_url("https://djinni.co/jobs/?page=2&primary_keyword=Python#top").unwrap();
/// assert_eq!(url.as_str(), "https://djinni.co/jobs/?page=2&primary_keyword=Python");
/// ```
pub fn canonicalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let mut params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if params.is_empty() {
            url.set_query(None);
        } else {
            params.sort();
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_fragment() {
        let url = canonicalize_url("https://djinni.co/jobs/1/#apply").unwrap();
        assert_eq!(url.as_str(), "https://djinni.co/jobs/1/");
    }

    #[test]
    fn test_sorts_query_params() {
        let a = canonicalize_url("https://djinni.co/jobs/?primary_keyword=Python&page=2").unwrap();
        let b = canonicalize_url("https://djinni.co/jobs/?page=2&primary_keyword=Python").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_query_removed() {
        let url = canonicalize_url("https://djinni.co/jobs/?").unwrap();
        assert_eq!(url.as_str(), "https://djinni.co/jobs/");
    }

    #[test]
    fn test_keeps_trailing_slash_and_case_of_path() {
        let url = canonicalize_url("https://DJINNI.co/Jobs/").unwrap();
        assert_eq!(url.as_str(), "https://djinni.co/Jobs/");
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            canonicalize_url("ftp://djinni.co/"),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(matches!(canonicalize_url("not a url"), Err(UrlError::Parse(_))));
    }
}
