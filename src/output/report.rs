use crate::CrawlError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one fetched (or terminally failed) page
///
/// `T` is whatever the injected page analyzer produces.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult<T> {
    /// Normalized URL that was requested
    pub url: String,

    /// Link hops from the seed
    pub depth: u32,

    /// Analyzer output; absent when the fetch or the analysis failed
    pub analysis: Option<T>,

    pub internal_link_count: usize,
    pub external_link_count: usize,

    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// HTTP status of the final response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// URL after redirects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
}

impl<T> PageResult<T> {
    /// Builds a failure result for a page that produced no analysis
    pub fn failure(url: &str, depth: u32, error: &CrawlError) -> Self {
        Self {
            url: url.to_string(),
            depth,
            analysis: None,
            internal_link_count: 0,
            external_link_count: 0,
            success: false,
            error: Some(error.to_string()),
            status_code: None,
            final_url: None,
        }
    }
}

/// Aggregate counters for a finished crawl
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlStats {
    /// Seed plus every enqueued link
    pub pages_discovered: u32,
    /// Successful fetches
    pub pages_crawled: u32,
    /// Distinct URLs whose fetch failed after all retries
    pub pages_failed: u32,
    /// Deepest successfully fetched page
    pub max_depth_reached: u32,
    pub crawl_duration_seconds: f64,
}

/// Everything a crawl returns
///
/// Always produced, even when every page failed; failure detail lives in
/// `stats.pages_failed` and in each result's `error`.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport<T> {
    pub start_url: String,
    pub started_at: DateTime<Utc>,
    /// True when the crawl stopped early on a cancellation request
    pub cancelled: bool,
    /// One entry per fetched page, in batch dispatch order
    pub results: Vec<PageResult<T>>,
    pub stats: CrawlStats,
}

impl<T> CrawlReport<T> {
    /// Iterates over successfully analyzed pages
    pub fn successes(&self) -> impl Iterator<Item = &PageResult<T>> {
        self.results.iter().filter(|r| r.success)
    }

    /// Iterates over failed pages
    pub fn failures(&self) -> impl Iterator<Item = &PageResult<T>> {
        self.results.iter().filter(|r| !r.success)
    }
}
