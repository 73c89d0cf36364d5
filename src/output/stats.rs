//! Plain-text rendering of crawl reports

use crate::output::CrawlReport;
use std::fmt::Display;

/// Renders a one-line summary of the crawl statistics
pub fn summarize<T>(report: &CrawlReport<T>) -> String {
    let stats = &report.stats;
    format!(
        "{} crawled, {} failed, {} discovered, max depth {}, {:.2}s",
        stats.pages_crawled,
        stats.pages_failed,
        stats.pages_discovered,
        stats.max_depth_reached,
        stats.crawl_duration_seconds
    )
}

/// Prints a crawl report to stdout
pub fn print_report<T: Display>(report: &CrawlReport<T>) {
    println!("=== Crawl Report ===\n");
    println!("Start URL: {}", report.start_url);
    println!("Started:   {}", report.started_at.to_rfc3339());
    if report.cancelled {
        println!("Status:    cancelled (partial results)");
    }

    println!("\nStatistics:");
    println!("  Pages discovered:  {}", report.stats.pages_discovered);
    println!("  Pages crawled:     {}", report.stats.pages_crawled);
    println!("  Pages failed:      {}", report.stats.pages_failed);
    println!("  Max depth reached: {}", report.stats.max_depth_reached);
    println!(
        "  Duration:          {:.2}s",
        report.stats.crawl_duration_seconds
    );

    println!("\nPages ({}):", report.results.len());
    for result in &report.results {
        if result.success {
            println!(
                "  [ok]   d{} {} ({} internal, {} external links)",
                result.depth, result.url, result.internal_link_count, result.external_link_count
            );
        } else {
            println!(
                "  [fail] d{} {}: {}",
                result.depth,
                result.url,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }

        if let Some(analysis) = &result.analysis {
            println!("         {}", analysis);
        }
    }
}
