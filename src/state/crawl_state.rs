use crate::robots::RobotsCache;
use std::collections::HashSet;
use std::time::Duration;

/// Mutable bookkeeping for a single crawl
///
/// Only the crawl loop mutates this structure; concurrently running fetches
/// report outcomes back to the loop instead of touching it.
#[derive(Debug)]
pub struct CrawlState {
    /// Normalized URLs already dispatched for fetch
    visited: HashSet<String>,

    /// Normalized URLs whose fetch failed after all retries
    failed: HashSet<String>,

    /// robots.txt rules per origin
    pub robots: RobotsCache,

    pages_discovered: u32,
    pages_crawled: u32,
    max_depth_reached: u32,
}

impl CrawlState {
    /// Creates empty state; robots.txt lookups use `robots_timeout`
    pub fn new(robots_timeout: Duration) -> Self {
        Self {
            visited: HashSet::new(),
            failed: HashSet::new(),
            robots: RobotsCache::new(robots_timeout),
            pages_discovered: 0,
            pages_crawled: 0,
            max_depth_reached: 0,
        }
    }

    /// Marks a URL as dispatched; returns false if it already was
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Records a terminal fetch failure
    pub fn mark_failed(&mut self, url: &str) {
        self.failed.insert(url.to_string());
    }

    pub fn is_failed(&self, url: &str) -> bool {
        self.failed.contains(url)
    }

    /// Counts a newly enqueued page
    pub fn record_discovered(&mut self) {
        self.pages_discovered += 1;
    }

    /// Counts a successful fetch at the given depth
    pub fn record_crawled(&mut self, depth: u32) {
        self.pages_crawled += 1;
        self.max_depth_reached = self.max_depth_reached.max(depth);
    }

    pub fn pages_discovered(&self) -> u32 {
        self.pages_discovered
    }

    pub fn pages_crawled(&self) -> u32 {
        self.pages_crawled
    }

    pub fn pages_failed(&self) -> u32 {
        self.failed.len() as u32
    }

    pub fn max_depth_reached(&self) -> u32 {
        self.max_depth_reached
    }
}
