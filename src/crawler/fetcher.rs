//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building the HTTP client with the configured redirect policy
//! - GET requests with timeout and identifying headers
//! - Retry with a fixed delay for transport failures and non-success statuses
//! - Rejecting non-HTML responses without retrying

use crate::config::CrawlerConfig;
use crate::crawler::FetchedPage;
use crate::CrawlError;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Maximum redirect hops followed per request
pub const MAX_REDIRECTS: usize = 5;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.5";

/// Per-request fetch settings
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub follow_redirects: bool,
    pub user_agent: String,
}

impl From<&CrawlerConfig> for FetchOptions {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout),
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay),
            follow_redirects: config.follow_redirects,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Why a single attempt failed
#[derive(Debug, Error)]
enum AttemptError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Too many redirects")]
    Redirect,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Expected HTML, got {0}")]
    ContentMismatch(String),

    #[error("Failed to read body: {0}")]
    Body(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for AttemptError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_redirect() {
            Self::Redirect
        } else {
            Self::Other(e.to_string())
        }
    }
}

/// Builds an HTTP client for a crawl
///
/// Redirects are followed up to [`MAX_REDIRECTS`] hops when
/// `follow_redirects` is set; otherwise the redirect response itself is
/// returned to the caller.
///
/// # Example
///
/// ```
/// use crawl_audit::config::CrawlerConfig;
/// use crawl_audit::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let redirect = if config.follow_redirects {
        Policy::limited(MAX_REDIRECTS)
    } else {
        Policy::none()
    };

    Client::builder()
        .user_agent(config.user_agent.clone())
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, retrying failed attempts
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | 2xx with an HTML content type | Success |
/// | 2xx with any other content type | [`CrawlError::ContentMismatch`], no retry |
/// | 3xx with redirects disabled | Success (the redirect is the final response) |
/// | Other status | Retry |
/// | Timeout / connection / redirect-limit error | Retry |
///
/// Up to `max_retries` retries follow the first attempt, each after a fixed
/// `retry_delay`. Exhausting them yields [`CrawlError::FetchFailed`] carrying
/// the last attempt's cause.
pub async fn fetch_page(
    client: &Client,
    url: &str,
    options: &FetchOptions,
) -> Result<FetchedPage, CrawlError> {
    let attempts = options.max_retries + 1;
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match fetch_once(client, url, options).await {
            Ok(page) => return Ok(page),
            Err(AttemptError::ContentMismatch(content_type)) => {
                return Err(CrawlError::ContentMismatch {
                    url: url.to_string(),
                    content_type,
                });
            }
            Err(e) => {
                tracing::warn!(
                    "Fetch attempt {}/{} for {} failed: {}",
                    attempt,
                    attempts,
                    url,
                    e
                );
                last_error = e.to_string();
            }
        }

        if attempt < attempts {
            tokio::time::sleep(options.retry_delay).await;
        }
    }

    Err(CrawlError::FetchFailed {
        url: url.to_string(),
        attempts,
        message: last_error,
    })
}

/// Performs a single GET request
async fn fetch_once(
    client: &Client,
    url: &str,
    options: &FetchOptions,
) -> Result<FetchedPage, AttemptError> {
    let response = client
        .get(url)
        .header(USER_AGENT, options.user_agent.as_str())
        .header(ACCEPT, ACCEPT_HTML)
        .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
        .timeout(options.timeout)
        .send()
        .await?;

    let status = response.status();
    if !is_final_status(status, options.follow_redirects) {
        return Err(AttemptError::Status(status.as_u16()));
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if status.is_success() && !is_html(&content_type) {
        let content_type = if content_type.is_empty() {
            "no content type".to_string()
        } else {
            content_type
        };
        return Err(AttemptError::ContentMismatch(content_type));
    }

    let body = response
        .text()
        .await
        .map_err(|e| AttemptError::Body(e.to_string()))?;

    Ok(FetchedPage {
        url: url.to_string(),
        final_url,
        status_code: status.as_u16(),
        content_type,
        body,
    })
}

fn is_final_status(status: StatusCode, follow_redirects: bool) -> bool {
    status.is_success() || (!follow_redirects && status.is_redirection())
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}
