//! Progress statistics for a crawl job
//!
//! This module provides functionality for collecting and displaying
//! frontier statistics.

use crate::frontier::{Frontier, OfferSummary};
use chrono::{DateTime, Utc};

/// Frontier statistics summary
#[derive(Debug, Clone)]
pub struct FrontierStatistics {
    /// Distinct URLs seen in this job
    pub total_seen: usize,

    /// Distinct URLs first seen as content
    pub content_seen: usize,

    /// Distinct URLs seen as sitemaps, robots.txt or untagged
    pub non_content_seen: usize,

    /// Offers that queued a new URL
    pub enqueued: u64,

    /// Offers discarded as already seen
    pub duplicates: u64,

    /// Offers rejected as invalid URLs
    pub rejected: u64,

    /// URLs still waiting in the queue
    pub pending: usize,

    /// When the statistics were collected
    pub generated_at: DateTime<Utc>,
}

impl FrontierStatistics {
    /// Share of valid offers that were duplicates, as a percentage
    pub fn duplicate_rate(&self) -> f64 {
        let valid = self.enqueued + self.duplicates;
        if valid == 0 {
            0.0
        } else {
            (self.duplicates as f64 / valid as f64) * 100.0
        }
    }
}

/// Collects statistics from a frontier and the summary of offers made to it
///
/// The seen counters come from a single snapshot, so `content_seen` never
/// exceeds `total_seen`.
pub fn collect_statistics(frontier: &Frontier, summary: &OfferSummary) -> FrontierStatistics {
    let snapshot = frontier.progress();

    FrontierStatistics {
        total_seen: snapshot.total,
        content_seen: snapshot.content,
        non_content_seen: snapshot.non_content(),
        enqueued: summary.enqueued,
        duplicates: summary.duplicates,
        rejected: summary.rejected,
        pending: frontier.pending(),
        generated_at: Utc::now(),
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &FrontierStatistics) {
    println!("=== Frontier Statistics ===\n");

    println!("Seen URLs:");
    println!("  Total distinct: {}", stats.total_seen);
    println!("  Content: {}", stats.content_seen);
    println!("  Other (sitemaps, robots.txt, untagged): {}", stats.non_content_seen);
    println!();

    println!("Offers:");
    println!("  Enqueued: {}", stats.enqueued);
    println!("  Duplicates: {}", stats.duplicates);
    println!("  Rejected: {}", stats.rejected);
    println!("  Pending in queue: {}", stats.pending);
    println!();

    println!(
        "Duplicate Rate: {:.1}% ({} / {} valid offers)",
        stats.duplicate_rate(),
        stats.duplicates,
        stats.enqueued + stats.duplicates
    );
    println!("Generated at: {}", stats.generated_at.to_rfc3339());
}
