//! State module for tracking what the crawl has already seen
//!
//! # Components
//!
//! - `SeenUrls`: Thread-safe store deciding whether a discovered URL is new
//! - `SeenSnapshot`: Consistent read of the store's total and content counters
//! - `UrlKind`: Classification tag recorded with each URL

mod seen_urls;
mod url_kind;

// Re-export main types
pub use seen_urls::{SeenSnapshot, SeenUrls};
pub use url_kind::UrlKind;
