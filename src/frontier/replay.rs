//! Concurrent replay of recorded discoveries
//!
//! A replay feeds a list of candidate URLs through several workers that share
//! one frontier, the same way fetch workers share it during a live crawl.

use crate::frontier::queue::{Frontier, OfferSummary};
use crate::state::{SeenSnapshot, UrlKind};
use crate::FrontierError;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Number of offers a worker makes before yielding to the scheduler
const YIELD_EVERY: usize = 64;

/// One recorded discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Raw URL as discovered
    pub url: String,

    /// Classification tag
    pub kind: UrlKind,

    /// 1-based line number in the input
    pub line: usize,
}

/// Result of a replay run
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub summary: OfferSummary,
    pub snapshot: SeenSnapshot,
    pub elapsed: Duration,
}

/// Parses a candidate list
///
/// Each line holds a URL optionally followed by a tag (`content`, `sitemap`,
/// `robots_txt`, `none`). Blank lines and lines starting with `#` are skipped.
/// An unknown tag is logged and treated as no tag.
///
/// # Errors
///
/// Returns `FrontierError::InvalidInput` for a line with more than two fields.
pub fn parse_candidates(input: &str) -> Result<Vec<Candidate>, FrontierError> {
    let mut candidates = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let (url, tag) = match fields.as_slice() {
            [url] => (*url, None),
            [url, tag] => (*url, Some(*tag)),
            _ => {
                return Err(FrontierError::InvalidInput {
                    line: line_no,
                    message: format!("expected '<url> [tag]', got {} fields", fields.len()),
                })
            }
        };

        let kind = match tag {
            None => UrlKind::Unclassified,
            Some(tag) => UrlKind::from_tag(tag).unwrap_or_else(|| {
                tracing::warn!(
                    "Line {}: unknown tag '{}', treating as unclassified",
                    line_no,
                    tag
                );
                UrlKind::Unclassified
            }),
        };

        candidates.push(Candidate {
            url: url.to_string(),
            kind,
            line: line_no,
        });
    }

    Ok(candidates)
}

/// Reads and parses a candidate list file
pub fn load_candidates(path: &Path) -> Result<Vec<Candidate>, FrontierError> {
    let content = std::fs::read_to_string(path)?;
    parse_candidates(&content)
}

/// Offers every candidate to the frontier using `workers` concurrent tasks
///
/// Candidates are dealt round-robin, so duplicates of one URL usually land
/// on different workers and race each other for the seen-URL store.
///
/// # Errors
///
/// Returns `FrontierError::Worker` if a worker task panics.
pub async fn replay(
    frontier: Arc<Frontier>,
    candidates: Vec<Candidate>,
    workers: usize,
) -> Result<ReplayReport, FrontierError> {
    let workers = workers.max(1);
    let start = Instant::now();

    let mut batches: Vec<Vec<Candidate>> = vec![Vec::new(); workers];
    for (i, candidate) in candidates.into_iter().enumerate() {
        batches[i % workers].push(candidate);
    }

    tracing::info!(
        "Replaying {} candidates across {} workers",
        batches.iter().map(Vec::len).sum::<usize>(),
        workers
    );

    let mut handles = Vec::with_capacity(workers);
    for (worker_id, batch) in batches.into_iter().enumerate() {
        let frontier = Arc::clone(&frontier);
        handles.push(tokio::spawn(async move {
            run_worker(worker_id, &frontier, batch).await
        }));
    }

    let summary = join_workers(handles).await?;

    let report = ReplayReport {
        summary,
        snapshot: frontier.progress(),
        elapsed: start.elapsed(),
    };

    tracing::info!(
        "Replay finished in {:.2?}: {} enqueued, {} duplicates, {} rejected",
        report.elapsed,
        summary.enqueued,
        summary.duplicates,
        summary.rejected
    );

    Ok(report)
}

/// Waits for every worker and merges their summaries
///
/// All handles are awaited even after one fails, so no worker is still
/// offering when the caller sees the error. The first failure is returned.
async fn join_workers(
    handles: Vec<JoinHandle<OfferSummary>>,
) -> Result<OfferSummary, FrontierError> {
    let mut summary = OfferSummary::default();
    let mut failure = None;

    for (worker_id, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(worker_summary) => summary += worker_summary,
            Err(e) => {
                tracing::error!("Worker {} failed: {}", worker_id, e);
                failure.get_or_insert(e);
            }
        }
    }

    match failure {
        Some(e) => Err(FrontierError::Worker(e)),
        None => Ok(summary),
    }
}

async fn run_worker(worker_id: usize, frontier: &Frontier, batch: Vec<Candidate>) -> OfferSummary {
    let mut summary = OfferSummary::default();

    for (i, candidate) in batch.iter().enumerate() {
        let outcome = frontier.offer(&candidate.url, candidate.kind);
        if let Err(e) = &outcome {
            tracing::warn!(
                "Worker {}: line {}: rejected {}: {}",
                worker_id,
                candidate.line,
                candidate.url,
                e
            );
        }
        summary.record(&outcome);

        if (i + 1) % YIELD_EVERY == 0 {
            tokio::task::yield_now().await;
        }
    }

    tracing::debug!(
        "Worker {} done: {} offered, {} enqueued",
        worker_id,
        summary.offered(),
        summary.enqueued
    );
    summary
}
