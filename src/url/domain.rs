use url::Url;

/// Extracts the lowercase host from a URL
///
/// Returns None if the URL has no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_frontier::url::extract_domain;
///
/// let url = Url::parse("https://Sub.Example.com:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
