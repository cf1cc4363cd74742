use crate::config::CanonicalRules;
use crate::UrlError;
use url::Url;

/// Query parameters that never identify a distinct page
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
    "ref",
    "source",
];

/// Normalizes a URL with the default canonicalization rules
///
/// # Examples
///
/// ```
/// use ripple_frontier::url::normalize_url;
///
/// let url = normalize_url("https://WWW.EXAMPLE.COM/page/#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    normalize_url_with(url_str, &CanonicalRules::default())
}

/// Normalizes a URL into its canonical form
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https` (the scheme itself is kept)
/// 3. Lowercase the host, dropping a `www.` prefix if `rules.strip_www`
/// 4. Normalize the path:
///    - Remove dot segments (. and ..) and empty segments
///    - Remove trailing slash (except for root /)
///    - Empty path becomes /
/// 5. Remove the fragment
/// 6. Remove the whole query if `rules.strip_query`, otherwise remove tracking
///    parameters and sort the remaining ones
/// 7. Remove an empty query string (trailing ?)
///
/// Explicit non-default ports are preserved.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
/// * `rules` - Canonicalization rules from configuration
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
pub fn normalize_url_with(url_str: &str, rules: &CanonicalRules) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(&mut url, rules)?;
    Ok(url)
}

/// Applies normalization steps 2-7 to an already parsed URL
pub(crate) fn canonicalize(url: &mut Url, rules: &CanonicalRules) -> Result<(), UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = url.host_str().ok_or(UrlError::MissingDomain)?;
    let mut normalized_host = host.to_lowercase();
    if rules.strip_www {
        if let Some(stripped) = normalized_host.strip_prefix("www.") {
            normalized_host = stripped.to_string();
        }
    }
    if normalized_host.is_empty() {
        return Err(UrlError::MissingDomain);
    }
    if normalized_host != host {
        url.set_host(Some(&normalized_host))
            .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    if url.query().is_some() {
        let kept = if rules.strip_query {
            Vec::new()
        } else {
            filter_and_sort_query_params(url, &rules.tracking_params)
        };

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    Ok(())
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Filters out tracking parameters and sorts the remaining ones by key
fn filter_and_sort_query_params(url: &Url, extra: &[String]) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key, extra))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    params.sort();
    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str, extra: &[String]) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_") || extra.iter().any(|p| p == key)
}
