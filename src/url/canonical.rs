use crate::config::CanonicalRules;
use crate::url::domain::extract_domain;
use crate::url::normalize::{canonicalize, normalize_url_with};
use crate::UrlError;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A URL in canonical form
///
/// Two `CanonicalUrl` values are equal exactly when their canonical strings are
/// equal, so the canonical string can be used directly as a deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl {
    url: Url,
}

impl CanonicalUrl {
    /// Parses and canonicalizes a raw URL string with the default rules
    ///
    /// # Examples
    ///
    /// ```
    /// use ripple_frontier::url::CanonicalUrl;
    ///
    /// let a = CanonicalUrl::parse("https://www.example.com/docs/").unwrap();
    /// let b = CanonicalUrl::parse("https://example.com/docs#intro").unwrap();
    /// assert_eq!(a, b);
    /// assert!(CanonicalUrl::parse("not a url").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        Self::parse_with(raw, &CanonicalRules::default())
    }

    /// Parses and canonicalizes a raw URL string with the given rules
    pub fn parse_with(raw: &str, rules: &CanonicalRules) -> Result<Self, UrlError> {
        normalize_url_with(raw, rules).map(|url| Self { url })
    }

    /// Resolves `href` against this URL and canonicalizes the result
    pub fn join(&self, href: &str, rules: &CanonicalRules) -> Result<Self, UrlError> {
        let mut url = self
            .url
            .join(href.trim())
            .map_err(|e| UrlError::Parse(e.to_string()))?;
        canonicalize(&mut url, rules)?;
        Ok(Self { url })
    }

    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the underlying parsed URL
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Returns the lowercase host of this URL
    pub fn domain(&self) -> Option<String> {
        extract_domain(&self.url)
    }

    /// Returns the normalized path
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Consumes the wrapper and returns the parsed URL
    pub fn into_url(self) -> Url {
        self.url
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for CanonicalUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
