//! Crawl frontier built on the seen-URL store
//!
//! This module contains:
//! - Link discovery and classification for HTML pages, sitemaps and robots.txt
//! - The deduplicating frontier queue shared by crawl workers
//! - Concurrent replay of recorded discoveries

mod discovery;
mod queue;
mod replay;

pub use discovery::{
    classify_url, extract_page_links, extract_robots_sitemaps, extract_sitemap_links, robots_url,
    DiscoveredLink,
};
pub use queue::{Frontier, Offer, OfferSummary, QueuedUrl};
pub use replay::{load_candidates, parse_candidates, replay, Candidate, ReplayReport};
