use url::Url;

/// Extracts the host from a URL, lower-cased
///
/// The port is not part of the result.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use seed_harvest::url::extract_host;
///
/// let url = Url::parse("https://Benning.ARMY.mil:8443/path").unwrap();
/// assert_eq!(extract_host(&url), Some("benning.army.mil".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks a URL against a target's domain allow-list
///
/// An empty allow-list admits every URL (open crawl). Otherwise the URL's
/// host must end with one of the allowed suffixes, compared
/// case-insensitively, so `army.mil` admits `benning.army.mil`. URLs that
/// do not parse or carry no host are only admitted by an open crawl.
///
/// # Examples
///
/// ```
/// use seed_harvest::url::is_allowed;
///
/// let domains = vec!["army.mil".to_string()];
/// assert!(is_allowed("https://benning.army.mil/housing", &domains));
/// assert!(!is_allowed("https://example.com/", &domains));
/// assert!(is_allowed("https://example.com/", &[] as &[&str]));
/// ```
pub fn is_allowed<S: AsRef<str>>(url: &str, allowed_domains: &[S]) -> bool {
    if allowed_domains.is_empty() {
        return true;
    }

    let host = match Url::parse(url).ok().as_ref().and_then(extract_host) {
        Some(h) => h,
        None => return false,
    };

    allowed_domains
        .iter()
        .any(|domain| host.ends_with(&domain.as_ref().to_lowercase()))
}
