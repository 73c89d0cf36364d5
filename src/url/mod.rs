//! URL handling module for Crawl-Audit
//!
//! This module provides URL normalization and host helpers used to
//! deduplicate the frontier and to classify links as internal or external.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, is_same_host, robots_url};
pub use normalize::{normalize_or_raw, normalize_url};
