//! State module for tracking crawl progress
//!
//! Every crawl invocation owns a fresh [`CrawlState`]; nothing is shared
//! between crawls.

mod crawl_state;

pub use crawl_state::CrawlState;
