//! Ripple-Frontier: seen-URL tracking for a concurrent crawl frontier
//!
//! This crate decides, for every link, sitemap entry or robots.txt file
//! discovered during a crawl, whether it has already been seen in the current
//! crawl job. Workers share one [`state::SeenUrls`] store per job; exactly one
//! of any number of concurrent discoveries of a URL is reported as new.

pub mod config;
pub mod frontier;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Ripple-Frontier operations
#[derive(Debug, Error)]
pub enum FrontierError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input on line {line}: {message}")]
    InvalidInput { line: usize, message: String },

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Ripple-Frontier operations
pub type Result<T> = std::result::Result<T, FrontierError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use frontier::{Frontier, Offer};
pub use state::{SeenSnapshot, SeenUrls, UrlKind};
pub use url::CanonicalUrl;
