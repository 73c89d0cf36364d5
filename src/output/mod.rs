//! Output module for crawl results
//!
//! This module defines the report returned by a crawl, the progress
//! snapshots emitted while it runs, and plain-text rendering of a report.

mod progress;
mod report;
mod stats;

pub use progress::CrawlProgress;
pub use report::{CrawlReport, CrawlStats, PageResult};
pub use stats::{print_report, summarize};
