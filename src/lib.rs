//! Crawl-Audit: a polite site crawler for page audits
//!
//! This crate walks a website breadth-first from a seed URL, respecting
//! robots.txt, depth and page budgets, and hands every fetched page to an
//! injected analyzer, collecting the results into a crawl report.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("Fetch failed for {url} after {attempts} attempt(s): {message}")]
    FetchFailed {
        url: String,
        attempts: u32,
        message: String,
    },

    #[error("robots.txt unavailable at {url}: {message}")]
    RobotsFetchFailed { url: String, message: String },

    #[error("Expected HTML, got {content_type} at {url}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Analyzer failed for {url}: {message}")]
    AnalyzerFailed { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

// Re-export commonly used types
pub use config::{Config, CrawlerConfig};
pub use crawler::{crawl, Crawler, FetchedPage, PageAnalyzer};
pub use output::{CrawlProgress, CrawlReport, CrawlStats, PageResult};
pub use crate::url::{normalize_or_raw, normalize_url};
