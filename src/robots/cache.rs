//! Per-crawl robots.txt cache
//!
//! One entry per distinct origin, keyed by the robots.txt URL. Entries live
//! for the remainder of the crawl and are never refreshed.

use crate::robots::{fetch_robots, RobotsRules};
use crate::url::robots_url;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Lazily populated robots.txt rules, keyed by robots.txt URL
#[derive(Debug)]
pub struct RobotsCache {
    entries: HashMap<String, RobotsRules>,
    timeout: Duration,
}

impl RobotsCache {
    /// Creates an empty cache whose fetches use the given timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            timeout,
        }
    }

    /// Checks if a URL may be fetched, loading its origin's robots.txt on a miss
    ///
    /// Never fails: unparseable URLs and unreachable robots.txt files are
    /// treated as allowed.
    pub async fn is_allowed(&mut self, client: &Client, url: &str, user_agent: &str) -> bool {
        let Some(key) = self.load(client, url, user_agent).await else {
            return true;
        };

        let allowed = self
            .entries
            .get(&key)
            .map_or(true, |rules| rules.is_allowed(url, user_agent));
        tracing::debug!("robots.txt {} {}", if allowed { "allows" } else { "denies" }, url);
        allowed
    }

    /// Returns the Crawl-delay (seconds) that applies to a URL's origin
    pub async fn crawl_delay(&mut self, client: &Client, url: &str, user_agent: &str) -> Option<f64> {
        let key = self.load(client, url, user_agent).await?;
        self.entries.get(&key)?.crawl_delay(user_agent)
    }

    /// Looks up cached rules by robots.txt URL
    pub fn get(&self, robots_url: &str) -> Option<&RobotsRules> {
        self.entries.get(robots_url)
    }

    /// Inserts rules for an origin, replacing any cached entry
    pub fn insert(&mut self, robots_url: &str, rules: RobotsRules) {
        self.entries.insert(robots_url.to_string(), rules);
    }

    /// Number of origins with cached rules
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no origin has been looked up yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ensures the rules for a URL's origin are cached and returns the cache key
    async fn load(&mut self, client: &Client, url: &str, user_agent: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let robots = robots_url(&parsed)?;
        let key = robots.to_string();

        if !self.entries.contains_key(&key) {
            tracing::debug!("Fetching {}", key);
            let rules = match fetch_robots(client, &robots, user_agent, self.timeout).await {
                Ok(parsed) => RobotsRules::Parsed(parsed),
                Err(e) => {
                    tracing::debug!("{}; allowing all", e);
                    RobotsRules::AllowAll
                }
            };
            self.entries.insert(key.clone(), rules);
        }

        Some(key)
    }
}
