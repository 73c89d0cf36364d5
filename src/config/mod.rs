//! Configuration module for Crawl-Audit
//!
//! This module handles loading, parsing, and validating crawl configuration,
//! either from a TOML file or from built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use crawl_audit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will fetch at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
