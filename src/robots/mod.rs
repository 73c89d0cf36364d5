//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching
//! robots.txt files. Any failure to retrieve a robots.txt installs a
//! permissive ruleset so that a missing or broken file never stalls a crawl.

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::{ParsedRobots, RobotsRules};

use crate::CrawlError;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Fetches and parses a robots.txt file
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `robots_url` - Location of the robots.txt file
/// * `user_agent` - The user agent string to send
/// * `timeout` - Timeout for the whole request
///
/// # Returns
///
/// * `Ok(ParsedRobots)` - Successfully fetched and parsed robots.txt
/// * `Err(CrawlError::RobotsFetchFailed)` - Network error, timeout, or non-2xx status
pub async fn fetch_robots(
    client: &Client,
    robots_url: &Url,
    user_agent: &str,
    timeout: Duration,
) -> Result<ParsedRobots, CrawlError> {
    let failed = |message: String| CrawlError::RobotsFetchFailed {
        url: robots_url.to_string(),
        message,
    };

    let response = client
        .get(robots_url.as_str())
        .header(USER_AGENT, user_agent)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| failed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(failed(format!("HTTP {}", status.as_u16())));
    }

    let body = response.text().await.map_err(|e| failed(e.to_string()))?;
    Ok(ParsedRobots::from_content(&body))
}
