//! The crawl frontier: deduplicated FIFO of URLs waiting to be fetched
//!
//! Every candidate passes through the job's [`SeenUrls`] store before it is
//! queued, so each canonical URL is enqueued at most once per job no matter
//! how many workers discover it.

use crate::config::{CanonicalRules, Config};
use crate::frontier::discovery::{
    extract_page_links, extract_robots_sitemaps, extract_sitemap_links, robots_url,
    DiscoveredLink,
};
use crate::state::{SeenSnapshot, SeenUrls, UrlKind};
use crate::url::CanonicalUrl;
use crate::UrlError;
use std::collections::VecDeque;
use std::ops::AddAssign;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Outcome of offering one candidate to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// First sighting in this job; the URL was queued
    Enqueued,

    /// Already seen in this job; the URL was discarded
    Duplicate,
}

/// Tally of offers made in a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OfferSummary {
    pub enqueued: u64,
    pub duplicates: u64,
    /// Candidates that could not be canonicalized
    pub rejected: u64,
}

impl OfferSummary {
    /// Total number of candidates offered
    pub fn offered(&self) -> u64 {
        self.enqueued + self.duplicates + self.rejected
    }

    /// Records one offer outcome
    pub fn record(&mut self, outcome: &Result<Offer, UrlError>) {
        match outcome {
            Ok(Offer::Enqueued) => self.enqueued += 1,
            Ok(Offer::Duplicate) => self.duplicates += 1,
            Err(_) => self.rejected += 1,
        }
    }
}

impl AddAssign for OfferSummary {
    fn add_assign(&mut self, other: Self) {
        self.enqueued += other.enqueued;
        self.duplicates += other.duplicates;
        self.rejected += other.rejected;
    }
}

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// Canonical URL to fetch
    pub url: CanonicalUrl,

    /// Classification recorded when the URL was first seen
    pub kind: UrlKind,
}

/// Deduplicating crawl frontier for one crawl job
///
/// `Frontier` is shared between workers behind an `Arc`; all methods take
/// `&self`.
#[derive(Debug)]
pub struct Frontier {
    seen: Arc<SeenUrls>,
    rules: CanonicalRules,
    queue: Mutex<VecDeque<QueuedUrl>>,
    offers: AtomicU64,
    progress_interval: u64,
}

impl Frontier {
    /// Creates a frontier with a fresh seen-URL store sized from `config`
    pub fn new(config: &Config) -> Self {
        let seen = Arc::new(SeenUrls::with_capacity(config.frontier.initial_capacity));
        let mut frontier = Self::with_seen(seen, config.canonical.clone());
        frontier.progress_interval = config.frontier.progress_interval.max(1);
        frontier
    }

    /// Creates a frontier around an existing seen-URL store
    pub fn with_seen(seen: Arc<SeenUrls>, rules: CanonicalRules) -> Self {
        Self {
            seen,
            rules,
            queue: Mutex::new(VecDeque::new()),
            offers: AtomicU64::new(0),
            progress_interval: u64::MAX,
        }
    }

    /// Returns the seen-URL store backing this frontier
    pub fn seen(&self) -> &Arc<SeenUrls> {
        &self.seen
    }

    /// Returns the canonicalization rules applied to raw candidates
    pub fn rules(&self) -> &CanonicalRules {
        &self.rules
    }

    /// Canonicalizes a raw URL and offers it to the frontier
    ///
    /// # Returns
    ///
    /// * `Ok(Offer::Enqueued)` - First sighting; the URL is now queued
    /// * `Ok(Offer::Duplicate)` - Already seen in this job
    /// * `Err(UrlError)` - The candidate is not a valid crawlable URL
    pub fn offer(&self, raw: &str, kind: UrlKind) -> Result<Offer, UrlError> {
        let url = CanonicalUrl::parse_with(raw, &self.rules)?;
        Ok(self.offer_url(url, kind))
    }

    /// Offers an already canonical URL to the frontier
    pub fn offer_url(&self, url: CanonicalUrl, kind: UrlKind) -> Offer {
        // Queue lock first, then the store: the mark and the push are one step
        // for `retract` and `reset`.
        let outcome = {
            let mut queue = self.lock_queue();
            if self.seen.mark_if_new(&url, kind) {
                queue.push_back(QueuedUrl { url, kind });
                Offer::Enqueued
            } else {
                Offer::Duplicate
            }
        };

        self.note_offer();
        outcome
    }

    /// Offers a batch of discovered links
    ///
    /// Links that fail canonicalization are logged and counted as rejected.
    pub fn offer_discovered(&self, links: &[DiscoveredLink]) -> OfferSummary {
        let mut summary = OfferSummary::default();

        for link in links {
            let outcome = self.offer(&link.url, link.kind);
            if let Err(e) = &outcome {
                tracing::warn!("Rejected discovered link {}: {}", link.url, e);
            }
            summary.record(&outcome);
        }

        summary
    }

    /// Extracts links from a fetched document and offers them
    ///
    /// The extractor is chosen by the kind the document was queued with:
    /// content pages are parsed as HTML, sitemaps for `<loc>` entries and
    /// robots.txt files for `Sitemap:` directives.
    pub fn offer_document(&self, source: &QueuedUrl, body: &str) -> OfferSummary {
        let base = source.url.as_url();
        let links = match source.kind {
            UrlKind::Content | UrlKind::Unclassified => extract_page_links(body, base),
            UrlKind::Sitemap => extract_sitemap_links(body, base),
            UrlKind::RobotsTxt => extract_robots_sitemaps(body, base),
        };

        tracing::debug!(
            "Discovered {} links in {} ({})",
            links.len(),
            source.url,
            source.kind
        );
        self.offer_discovered(&links)
    }

    /// Offers a seed URL as content, preceded by its host's robots.txt
    ///
    /// Returns the outcome for the seed itself.
    pub fn seed(&self, raw: &str) -> Result<Offer, UrlError> {
        let url = CanonicalUrl::parse_with(raw, &self.rules)?;

        if let Some(robots) = robots_url(url.as_url()) {
            let robots = CanonicalUrl::parse_with(robots.as_str(), &self.rules)?;
            self.offer_url(robots, UrlKind::RobotsTxt);
        }

        Ok(self.offer_url(url, UrlKind::Content))
    }

    /// Takes the next URL to fetch
    pub fn next(&self) -> Option<QueuedUrl> {
        self.lock_queue().pop_front()
    }

    /// Returns the number of queued URLs
    pub fn pending(&self) -> usize {
        self.lock_queue().len()
    }

    /// Returns a copy of the queued URLs in fetch order, leaving the queue as is
    pub fn queued(&self) -> Vec<QueuedUrl> {
        self.lock_queue().iter().cloned().collect()
    }

    /// Returns a consistent read of the seen counters
    pub fn progress(&self) -> SeenSnapshot {
        self.seen.snapshot()
    }

    /// Forgets a URL so it can be discovered and queued again
    ///
    /// Used for targeted re-crawls. A queued copy of the URL is dropped as
    /// well, so a later rediscovery cannot queue it twice.
    pub fn retract(&self, url: &CanonicalUrl) {
        {
            let mut queue = self.lock_queue();
            queue.retain(|queued| &queued.url != url);
            self.seen.delete(url);
        }
        tracing::debug!("Retracted {}", url);
    }

    /// Starts a new job: empties the queue and the seen-URL store
    ///
    /// Call between jobs, while no worker is offering URLs. The queue and the
    /// store are emptied together, but the offer counter behind the progress
    /// log is not: an offer still in flight when `reset` runs may be counted
    /// toward the next job's progress lines.
    pub fn reset(&self) {
        let dropped = {
            let mut queue = self.lock_queue();
            let dropped = queue.len();
            queue.clear();
            self.seen.clear();
            dropped
        };
        self.offers.store(0, Ordering::Relaxed);

        tracing::info!("Frontier reset ({} queued URLs dropped)", dropped);
    }

    fn note_offer(&self) {
        let offers = self.offers.fetch_add(1, Ordering::Relaxed) + 1;
        if offers % self.progress_interval == 0 {
            let progress = self.progress();
            tracing::info!(
                "Progress: {} offers, {} URLs seen ({} content), {} queued",
                offers,
                progress.total,
                progress.content,
                self.pending()
            );
        }
    }

    fn lock_queue(&self) -> MutexGuard<'_, VecDeque<QueuedUrl>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
