/// Checks if a domain matches a wildcard pattern
///
/// "djinni.co" matches the domain itself and any subdomain, however deeply
/// nested. The "*." prefix is accepted and means the same thing.
///
/// # Examples
///
/// ```
/// use vacancy_crawler::url::matches_wildcard;
///
/// assert!(matches_wildcard("djinni.co", "djinni.co"));
/// assert!(matches_wildcard("djinni.co", "www.djinni.co"));
/// assert!(matches_wildcard("*.djinni.co", "static.djinni.co"));
/// assert!(!matches_wildcard("*.djinni.co", "djinni.com"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    let base = pattern.strip_prefix("*.").unwrap_or(pattern);
    !base.is_empty()
        && (candidate == base
            || candidate
                .strip_suffix(base)
                .is_some_and(|prefix| prefix.ends_with('.')))
}
