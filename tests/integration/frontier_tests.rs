//! Integration tests for the frontier
//!
//! These tests drive a shared frontier from several tokio workers, the way a
//! crawl job's fetch workers use it.

use ripple_frontier::config::load_config;
use ripple_frontier::frontier::{parse_candidates, replay, Frontier, Offer, QueuedUrl};
use ripple_frontier::output::collect_statistics;
use ripple_frontier::state::{SeenSnapshot, UrlKind};
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp config");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp config");
    file
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_offers_enqueue_each_url_once() {
    let frontier = Arc::new(Frontier::new(&Default::default()));

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let frontier = Arc::clone(&frontier);
        tasks.push(tokio::spawn(async move {
            let mut enqueued = 0;
            for i in 0..100 {
                let url = format!("https://example.com/page/{}/", i);
                if frontier.offer(&url, UrlKind::Content) == Ok(Offer::Enqueued) {
                    enqueued += 1;
                }
            }
            enqueued
        }));
    }

    let mut total_enqueued = 0;
    for task in tasks {
        total_enqueued += task.await.expect("worker panicked");
    }

    assert_eq!(total_enqueued, 100);
    assert_eq!(frontier.pending(), 100);
    assert_eq!(
        frontier.progress(),
        SeenSnapshot {
            total: 100,
            content: 100
        }
    );

    let mut queued = HashSet::new();
    while let Some(QueuedUrl { url, .. }) = frontier.next() {
        assert!(queued.insert(url), "URL queued twice");
    }
    assert_eq!(queued.len(), 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_replay_with_config_rules() {
    let file = write_config(
        r#"
[frontier]
workers = 4
initial-capacity = 16

[canonical]
strip-query = true
"#,
    );
    let config = load_config(file.path()).expect("Failed to load config");
    let frontier = Arc::new(Frontier::new(&config));

    let candidates = parse_candidates(
        "https://example.com/robots.txt robots_txt\n\
         https://example.com/sitemap.xml sitemap\n\
         https://example.com/list?page=1 content\n\
         https://example.com/list?page=2 content\n\
         https://example.com/list/ content\n\
         https://example.com/about content\n\
         https://example.com/about sitemap\n\
         https://example.com/feed bogus\n\
         javascript:void(0) content\n",
    )
    .expect("Failed to parse candidates");

    let report = replay(
        Arc::clone(&frontier),
        candidates,
        config.frontier.workers as usize,
    )
    .await
    .expect("Replay failed");

    // With strip-query every /list variant is the same page
    assert_eq!(report.summary.enqueued, 5);
    assert_eq!(report.summary.duplicates, 3);
    assert_eq!(report.summary.rejected, 1);

    // The two /about offers race; the sitemap-tagged one may win, so only
    // /list is guaranteed to be counted as content.
    let snapshot = report.snapshot;
    assert_eq!(snapshot.total, 5);
    assert!(snapshot.content >= 1 && snapshot.content <= 2);

    let stats = collect_statistics(&frontier, &report.summary);
    assert_eq!(stats.total_seen, 5);
    assert_eq!(stats.pending, 5);
}

#[tokio::test]
async fn test_crawl_loop_over_documents() {
    let frontier = Frontier::new(&Default::default());
    frontier.seed("https://example.com/").expect("Invalid seed");

    let robots_body = "User-agent: *\nDisallow: /private\nSitemap: https://example.com/sitemap.xml\n";
    let sitemap_body = r#"<?xml version="1.0"?>
<urlset>
  <url><loc>https://example.com/</loc></url>
  <url><loc>https://example.com/blog</loc></url>
</urlset>"#;
    let home_body = r#"<html><body>
        <a href="/blog/">Blog</a>
        <a href="/about">About</a>
        <a href="/about#team">Team</a>
    </body></html>"#;
    let leaf_body = r#"<html><body><a href="/">Home</a></body></html>"#;

    let mut fetched = Vec::new();
    while let Some(queued) = frontier.next() {
        let body = match queued.url.path() {
            "/robots.txt" => robots_body,
            "/sitemap.xml" => sitemap_body,
            "/" => home_body,
            _ => leaf_body,
        };
        frontier.offer_document(&queued, body);
        fetched.push(queued.url.to_string());
    }

    // Every page is fetched exactly once even though the link graph is cyclic
    assert_eq!(
        fetched,
        vec![
            "https://example.com/robots.txt",
            "https://example.com/",
            "https://example.com/sitemap.xml",
            "https://example.com/blog",
            "https://example.com/about",
        ]
    );
    assert_eq!(
        frontier.progress(),
        SeenSnapshot {
            total: 5,
            content: 3
        }
    );
}

#[tokio::test]
async fn test_reset_between_jobs() {
    let frontier = Arc::new(Frontier::new(&Default::default()));
    let candidates = parse_candidates("https://example.com/a content\nhttps://example.com/b")
        .expect("Failed to parse candidates");

    let first = replay(Arc::clone(&frontier), candidates.clone(), 2)
        .await
        .expect("Replay failed");
    assert_eq!(first.summary.enqueued, 2);

    let again = replay(Arc::clone(&frontier), candidates.clone(), 2)
        .await
        .expect("Replay failed");
    assert_eq!(again.summary.duplicates, 2);

    frontier.reset();

    let after_reset = replay(Arc::clone(&frontier), candidates, 2)
        .await
        .expect("Replay failed");
    assert_eq!(after_reset.summary.enqueued, 2);
    assert_eq!(
        after_reset.snapshot,
        SeenSnapshot {
            total: 2,
            content: 1
        }
    );
}

#[tokio::test]
async fn test_listing_queue_keeps_pending_count() {
    let frontier = Arc::new(Frontier::new(&Default::default()));
    let candidates = parse_candidates(
        "https://example.com/a content\n\
         https://example.com/b content\n\
         https://example.com/a/ content\n",
    )
    .expect("Failed to parse candidates");

    let report = replay(Arc::clone(&frontier), candidates, 2)
        .await
        .expect("Replay failed");
    let before = collect_statistics(&frontier, &report.summary);

    let listed = frontier.queued();
    assert_eq!(listed.len(), 2);

    let after = collect_statistics(&frontier, &report.summary);
    assert_eq!(before.pending, 2);
    assert_eq!(after.pending, before.pending);
    assert_eq!(after.total_seen, before.total_seen);
}
