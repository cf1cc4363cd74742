/// Classification tags for URLs entering the frontier
///
/// A tag records why a URL was enqueued. Only [`UrlKind::Content`] is counted
/// separately by the seen-URL store.
use std::fmt;

/// Why a URL was discovered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum UrlKind {
    /// No classification supplied by the caller
    #[default]
    Unclassified,

    /// A content page (counts toward crawl yield)
    Content,

    /// A sitemap or sitemap index entry
    Sitemap,

    /// A robots.txt file
    RobotsTxt,
}

impl UrlKind {
    /// Returns true if URLs of this kind count toward `content_count`
    pub fn is_content(&self) -> bool {
        match self {
            Self::Content => true,
            Self::Unclassified | Self::Sitemap | Self::RobotsTxt => false,
        }
    }

    /// Returns the textual tag used in input files and logs
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Unclassified => "none",
            Self::Content => "content",
            Self::Sitemap => "sitemap",
            Self::RobotsTxt => "robots_txt",
        }
    }

    /// Parses a textual tag
    ///
    /// Returns None for tags outside the known set. Callers decide whether an
    /// unknown tag is an error or falls back to `Unclassified`.
    pub fn from_tag(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Some(Self::Unclassified),
            "content" => Some(Self::Content),
            "sitemap" => Some(Self::Sitemap),
            "robots_txt" | "robots" => Some(Self::RobotsTxt),
            _ => None,
        }
    }

    /// Returns all known kinds
    pub fn all_kinds() -> Vec<Self> {
        vec![
            Self::Unclassified,
            Self::Content,
            Self::Sitemap,
            Self::RobotsTxt,
        ]
    }
}

impl fmt::Display for UrlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}
