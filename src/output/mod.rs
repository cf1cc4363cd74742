//! Output module for reporting crawl progress

mod stats;

pub use stats::{collect_statistics, print_statistics, FrontierStatistics};
