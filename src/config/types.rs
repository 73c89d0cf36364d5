use serde::Deserialize;

/// Identifying user agent sent on every request unless overridden
pub const DEFAULT_USER_AGENT: &str = "CrawlAuditBot/1.0 (compatible; site audit crawler)";

/// Top-level configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
}

/// Crawl behavior configuration
///
/// Every field has a default, so an empty `[crawler]` table (or no file at
/// all) yields a usable configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Hard cap on total successful fetches
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Links beyond this depth are not enqueued
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Gate every fetch through robots.txt
    #[serde(rename = "respect-robots")]
    pub respect_robots: bool,

    /// Pause after each fetch attempt, per concurrent slot (milliseconds)
    pub delay: u64,

    /// Per-fetch timeout (milliseconds)
    pub timeout: u64,

    /// Maximum number of fetches dispatched in one batch
    pub concurrency: u32,

    /// Identifying string sent on every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Drop query strings during URL normalization
    #[serde(rename = "ignore-query")]
    pub ignore_query: bool,

    /// Retries after the first failed fetch attempt
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Follow up to 5 redirects per fetch
    #[serde(rename = "follow-redirects")]
    pub follow_redirects: bool,

    /// Fixed pause between fetch retries (milliseconds)
    #[serde(rename = "retry-delay")]
    pub retry_delay: u64,

    /// Timeout for robots.txt retrieval (milliseconds)
    #[serde(rename = "robots-timeout")]
    pub robots_timeout: u64,

    /// Stretch the per-entry delay to a host's robots.txt Crawl-delay
    #[serde(rename = "honor-crawl-delay")]
    pub honor_crawl_delay: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 20,
            max_depth: 3,
            respect_robots: true,
            delay: 1000,
            timeout: 30_000,
            concurrency: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ignore_query: true,
            max_retries: 2,
            follow_redirects: true,
            retry_delay: 1000,
            robots_timeout: 5000,
            honor_crawl_delay: false,
        }
    }
}
