//! Seen-URL store for deduplicating frontier candidates
//!
//! One `SeenUrls` is created per crawl job and shared by handle among every
//! worker of that job. All access funnels through a single mutex so that the
//! membership test and the insertion happen as one step: for any URL exactly
//! one concurrent `mark_if_new` call observes `true`.

use super::UrlKind;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A consistent read of both counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeenSnapshot {
    /// Number of distinct URLs seen
    pub total: usize,

    /// Number of distinct URLs first seen as content
    pub content: usize,
}

impl SeenSnapshot {
    /// Number of seen URLs that are not content (sitemaps, robots.txt, untagged)
    pub fn non_content(&self) -> usize {
        self.total - self.content
    }
}

/// State guarded by the store's lock
///
/// Every key maps to the kind it was first marked with. The content set is the
/// subset of keys whose kind is `Content`, so it is tracked as a count kept in
/// step with the map inside the same critical section.
#[derive(Debug, Default)]
struct SeenSets {
    all: HashMap<String, UrlKind>,
    content: usize,
}

/// Thread-safe record of every URL marked during a crawl job
#[derive(Debug, Default)]
pub struct SeenUrls {
    inner: Mutex<SeenSets>,
}

impl SeenUrls {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with room for `capacity` URLs
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(SeenSets {
                all: HashMap::with_capacity(capacity),
                content: 0,
            }),
        }
    }

    /// Marks a URL as seen if it has not been seen before
    ///
    /// Returns `true` if this call recorded the URL, `false` if it was already
    /// present. On `false` nothing changes: the kind recorded by the first
    /// successful call is kept even if `kind` differs.
    ///
    /// # Arguments
    ///
    /// * `url` - Canonical URL key (the store trusts the caller to normalize it)
    /// * `kind` - Classification; only `UrlKind::Content` raises `content_count`
    pub fn mark_if_new(&self, url: impl AsRef<str>, kind: UrlKind) -> bool {
        let url = url.as_ref();
        let inserted = {
            let mut sets = self.lock();
            if sets.all.contains_key(url) {
                false
            } else {
                sets.all.insert(url.to_owned(), kind);
                if kind.is_content() {
                    sets.content += 1;
                }
                true
            }
        };

        tracing::trace!("mark_if_new {} ({}): new={}", url, kind, inserted);
        inserted
    }

    /// Returns the number of distinct URLs seen
    pub fn count(&self) -> usize {
        self.lock().all.len()
    }

    /// Returns the number of distinct URLs first seen as content
    pub fn content_count(&self) -> usize {
        self.lock().content
    }

    /// Reads both counters under one lock acquisition
    pub fn snapshot(&self) -> SeenSnapshot {
        let sets = self.lock();
        SeenSnapshot {
            total: sets.all.len(),
            content: sets.content,
        }
    }

    /// Returns true if the URL has been marked
    pub fn contains(&self, url: impl AsRef<str>) -> bool {
        self.lock().all.contains_key(url.as_ref())
    }

    /// Returns the kind the URL was first marked with, if it has been seen
    pub fn kind_of(&self, url: impl AsRef<str>) -> Option<UrlKind> {
        self.lock().all.get(url.as_ref()).copied()
    }

    /// Returns true if no URL has been marked
    pub fn is_empty(&self) -> bool {
        self.lock().all.is_empty()
    }

    /// Forgets a URL so that the next `mark_if_new` treats it as new
    ///
    /// Deleting a URL that was never marked is a no-op.
    pub fn delete(&self, url: impl AsRef<str>) {
        let url = url.as_ref();
        let removed = {
            let mut sets = self.lock();
            let removed = sets.all.remove(url);
            if removed.is_some_and(|kind| kind.is_content()) {
                sets.content -= 1;
            }
            removed
        };

        if let Some(kind) = removed {
            tracing::debug!("Forgot seen URL {} ({})", url, kind);
        }
    }

    /// Forgets every URL at once
    pub fn clear(&self) {
        let forgotten = {
            let mut sets = self.lock();
            let forgotten = sets.all.len();
            sets.all.clear();
            sets.content = 0;
            forgotten
        };

        tracing::debug!("Cleared seen URL store ({} URLs forgotten)", forgotten);
    }

    /// Acquires the store's lock
    ///
    /// Each critical section leaves the sets consistent before it can panic, so
    /// a poisoned lock still guards valid state and is recovered.
    fn lock(&self) -> MutexGuard<'_, SeenSets> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
