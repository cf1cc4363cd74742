//! Link discovery from fetched documents
//!
//! This module turns fetched bodies into classified candidate URLs:
//! - HTML pages: `<a href>` and `<link rel="canonical">` links
//! - Sitemaps and sitemap indexes: `<loc>` entries
//! - robots.txt: `Sitemap:` directives
//!
//! Every candidate carries a [`UrlKind`] so the seen-URL store can keep its
//! content counter.

use crate::state::UrlKind;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use scraper::{Html, Selector};
use url::Url;

/// A link found in a fetched document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Absolute URL (not yet canonicalized)
    pub url: String,

    /// Why the link would be fetched
    pub kind: UrlKind,
}

/// Classifies a URL by its path
///
/// - `/robots.txt` is `RobotsTxt`
/// - a last path segment containing `sitemap` and ending in `.xml` or
///   `.xml.gz` is `Sitemap`
/// - everything else is `Content`
pub fn classify_url(url: &Url) -> UrlKind {
    let path = url.path().to_ascii_lowercase();
    if path == "/robots.txt" {
        return UrlKind::RobotsTxt;
    }

    let last_segment = path.rsplit('/').next().unwrap_or_default();
    if last_segment.contains("sitemap")
        && (last_segment.ends_with(".xml") || last_segment.ends_with(".xml.gz"))
    {
        return UrlKind::Sitemap;
    }

    UrlKind::Content
}

/// Extracts links from an HTML page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The page URL, used to resolve relative links
///
/// # Example
///
/// ```
/// use ripple_frontier::frontier::extract_page_links;
/// use ripple_frontier::state::UrlKind;
/// use url::Url;
///
/// let html = r#"<a href="/guide">Guide</a><a href="/sitemap.xml">Map</a>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let links = extract_page_links(html, &base);
/// assert_eq!(links[0].kind, UrlKind::Content);
/// assert_eq!(links[1].kind, UrlKind::Sitemap);
/// ```
pub fn extract_page_links(html: &str, base_url: &Url) -> Vec<DiscoveredLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(url) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
            {
                links.push(classified(url));
            }
        }
    }

    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical_selector) {
            if let Some(url) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
            {
                links.push(classified(url));
            }
        }
    }

    links
}

/// Extracts `<loc>` entries from a sitemap or sitemap index
///
/// Entries of a sitemap index (`<sitemap><loc>`) are always `Sitemap`.
/// Entries of a URL set (`<url><loc>`) are classified by path. Location text
/// may be split across character data, CDATA sections and entity references;
/// the pieces are joined before the URL is resolved.
///
/// Malformed XML ends extraction at the first error; entries read before it
/// are still returned.
pub fn extract_sitemap_links(xml: &str, base_url: &Url) -> Vec<DiscoveredLink> {
    let mut reader = Reader::from_str(xml);
    let mut links = Vec::new();
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut loc: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_ascii_lowercase();
                if name == b"loc" {
                    loc = Some(String::new());
                }
                open.push(name);
            }
            Ok(Event::End(_)) => {
                let closed = open.pop();
                if closed.as_deref() != Some(b"loc".as_slice()) {
                    continue;
                }
                let Some(text) = loc.take() else {
                    continue;
                };
                let Some(url) = resolve_link(&text, base_url) else {
                    continue;
                };

                match open.last().map(Vec::as_slice) {
                    Some(b"sitemap") => links.push(DiscoveredLink {
                        url: url.to_string(),
                        kind: UrlKind::Sitemap,
                    }),
                    Some(b"url") => links.push(classified(url)),
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(text) = loc.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(text) = loc.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if let Some(text) = loc.as_mut() {
                    if let Ok(Some(ch)) = e.resolve_char_ref() {
                        text.push(ch);
                    } else if let Some(entity) =
                        resolve_predefined_entity(&String::from_utf8_lossy(&e))
                    {
                        text.push_str(entity);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!(
                    "Malformed sitemap XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
            Ok(_) => {}
        }
    }

    links
}

/// Extracts `Sitemap:` directives from a robots.txt body
///
/// Directive names are matched case-insensitively. Relative sitemap paths are
/// resolved against `base_url`.
pub fn extract_robots_sitemaps(body: &str, base_url: &Url) -> Vec<DiscoveredLink> {
    let mut links = Vec::new();

    for line in body.lines() {
        // Strip trailing comments
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            if key.trim().eq_ignore_ascii_case("sitemap") {
                if let Some(url) = resolve_link(value, base_url) {
                    links.push(DiscoveredLink {
                        url: url.to_string(),
                        kind: UrlKind::Sitemap,
                    });
                }
            }
        }
    }

    links
}

/// Returns the robots.txt URL for the host of `url`
pub fn robots_url(url: &Url) -> Option<Url> {
    url.join("/robots.txt").ok()
}

fn classified(url: Url) -> DiscoveredLink {
    DiscoveredLink {
        kind: classify_url(&url),
        url: url.to_string(),
    }
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    base_url
        .join(href)
        .ok()
        .filter(|url| url.scheme() == "http" || url.scheme() == "https")
}
