//! Integration tests for the seen-URL store
//!
//! These tests share one store between many OS threads and check the
//! exactly-once contract of `mark_if_new` along with the counter invariants.

use ripple_frontier::state::{SeenSnapshot, SeenUrls, UrlKind};
use ripple_frontier::url::CanonicalUrl;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

const URL1: &str = "https://example.com/one";
const URL2: &str = "https://example.com/two";
const URL3: &str = "https://example.com/sitemap.xml";

#[test]
fn test_scenarios() {
    // Scenario 1
    let seen = SeenUrls::new();
    assert!(seen.mark_if_new(URL1, UrlKind::Unclassified));
    assert!(!seen.mark_if_new(URL1, UrlKind::Unclassified));

    // Scenario 2
    let seen = SeenUrls::new();
    assert!(seen.mark_if_new(URL1, UrlKind::Content));
    assert_eq!(seen.content_count(), 1);
    assert_eq!(seen.count(), 1);

    // Scenario 3
    let seen = SeenUrls::new();
    assert!(seen.mark_if_new(URL3, UrlKind::Sitemap));
    assert_eq!(seen.content_count(), 0);
    assert_eq!(seen.count(), 1);

    // Scenario 4
    let seen = SeenUrls::new();
    seen.mark_if_new(URL1, UrlKind::Content);
    seen.mark_if_new(URL2, UrlKind::Content);
    seen.mark_if_new(URL3, UrlKind::Sitemap);
    assert_eq!(seen.content_count(), 2);
    assert_eq!(seen.count(), 3);

    // Scenario 5
    seen.clear();
    assert_eq!(seen.count(), 0);
    assert_eq!(seen.content_count(), 0);

    // Scenario 6
    let seen = SeenUrls::new();
    seen.mark_if_new(URL1, UrlKind::Unclassified);
    seen.delete(URL1);
    assert_eq!(seen.count(), 0);
}

#[test]
fn test_canonical_urls_as_keys() {
    let seen = SeenUrls::new();
    let a = CanonicalUrl::parse("https://www.example.com/docs/").unwrap();
    let b = CanonicalUrl::parse("https://example.com/docs?utm_campaign=x").unwrap();

    assert!(seen.mark_if_new(&a, UrlKind::Content));
    assert!(!seen.mark_if_new(&b, UrlKind::Content));
    assert!(seen.contains(a.as_str()));
}

#[test]
fn test_exactly_one_winner_per_url() {
    const THREADS: usize = 16;

    let seen = Arc::new(SeenUrls::new());
    let barrier = Arc::new(Barrier::new(THREADS));
    let winners = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let seen = Arc::clone(&seen);
            let barrier = Arc::clone(&barrier);
            let winners = Arc::clone(&winners);
            thread::spawn(move || {
                barrier.wait();
                if seen.mark_if_new(URL1, UrlKind::Content) {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(winners.load(Ordering::SeqCst), 1);
    assert_eq!(seen.snapshot(), SeenSnapshot { total: 1, content: 1 });
}

#[test]
fn test_exactly_one_winner_per_url_many_urls() {
    const THREADS: usize = 8;
    const URLS: usize = 500;

    let seen = Arc::new(SeenUrls::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let seen = Arc::clone(&seen);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut wins = vec![false; URLS];
                for i in 0..URLS {
                    // Each thread walks the URLs from a different offset
                    let n = (i + t * 37) % URLS;
                    let kind = if n % 2 == 0 {
                        UrlKind::Content
                    } else {
                        UrlKind::Sitemap
                    };
                    wins[n] = seen.mark_if_new(format!("https://example.com/p/{}", n), kind);
                }
                wins
            })
        })
        .collect();

    let mut winners_per_url = vec![0usize; URLS];
    for handle in handles {
        for (n, won) in handle.join().unwrap().into_iter().enumerate() {
            if won {
                winners_per_url[n] += 1;
            }
        }
    }

    assert!(winners_per_url.iter().all(|&w| w == 1));
    assert_eq!(seen.count(), URLS);
    assert_eq!(seen.content_count(), URLS / 2);
}

#[test]
fn test_concurrent_first_kind_wins() {
    const THREADS: usize = 12;

    let seen = Arc::new(SeenUrls::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let seen = Arc::clone(&seen);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let kind = if t % 2 == 0 {
                    UrlKind::Content
                } else {
                    UrlKind::RobotsTxt
                };
                barrier.wait();
                (kind, seen.mark_if_new(URL1, kind))
            })
        })
        .collect();

    let results: Vec<(UrlKind, bool)> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners: Vec<UrlKind> = results
        .iter()
        .filter(|(_, won)| *won)
        .map(|(kind, _)| *kind)
        .collect();

    assert_eq!(winners.len(), 1);
    assert_eq!(seen.kind_of(URL1), Some(winners[0]));
    let expected_content = usize::from(winners[0] == UrlKind::Content);
    assert_eq!(seen.content_count(), expected_content);
}

#[test]
fn test_snapshots_stay_consistent_under_contention() {
    const WRITERS: usize = 4;
    const ROUNDS: usize = 300;

    let seen = Arc::new(SeenUrls::new());
    let barrier = Arc::new(Barrier::new(WRITERS + 1));

    let writers: Vec<_> = (0..WRITERS)
        .map(|w| {
            let seen = Arc::clone(&seen);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..ROUNDS {
                    let url = format!("https://example.com/{}/{}", w, i % 50);
                    match i % 4 {
                        0 | 1 => {
                            seen.mark_if_new(&url, UrlKind::Content);
                        }
                        2 => {
                            seen.mark_if_new(&url, UrlKind::Sitemap);
                        }
                        _ => seen.delete(&url),
                    }
                    if w == 0 && i == ROUNDS / 2 {
                        seen.clear();
                    }
                }
            })
        })
        .collect();

    let reader = {
        let seen = Arc::clone(&seen);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..ROUNDS * 2 {
                let snapshot = seen.snapshot();
                assert!(snapshot.content <= snapshot.total);
            }
        })
    };

    for writer in writers {
        writer.join().unwrap();
    }
    reader.join().unwrap();

    let snapshot = seen.snapshot();
    assert!(snapshot.content <= snapshot.total);
}

#[test]
fn test_delete_races_with_mark() {
    const ROUNDS: usize = 200;

    let seen = Arc::new(SeenUrls::new());

    let marker = {
        let seen = Arc::clone(&seen);
        thread::spawn(move || {
            for _ in 0..ROUNDS {
                seen.mark_if_new(URL1, UrlKind::Content);
            }
        })
    };
    let deleter = {
        let seen = Arc::clone(&seen);
        thread::spawn(move || {
            for _ in 0..ROUNDS {
                seen.delete(URL1);
            }
        })
    };

    marker.join().unwrap();
    deleter.join().unwrap();

    // Whatever the interleaving, both sets agree on URL1
    let present = seen.contains(URL1);
    assert_eq!(seen.count(), usize::from(present));
    assert_eq!(seen.content_count(), usize::from(present));
}
