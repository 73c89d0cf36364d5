//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - HTML link extraction and classification
//! - Breadth-first frontier management
//! - Overall crawl coordination and the analyzer seam

mod analyzer;
mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use analyzer::{FetchedPage, PageAnalyzer};
pub use coordinator::{crawl, Crawler, ProgressCallback};
pub use fetcher::{build_http_client, fetch_page, FetchOptions, MAX_REDIRECTS};
pub use parser::{extract_links, extract_links_from_html, ExtractedLinks};
pub use scheduler::{FrontierEntry, Scheduler};
