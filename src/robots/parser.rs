//! Robots.txt parser implementation
//!
//! Allow/deny decisions are delegated to the robotstxt crate; the
//! Crawl-delay directive is read separately since that crate ignores it.

use robotstxt::DefaultMatcher;

/// Rules governing one origin
///
/// Either a parsed robots.txt or the permissive fallback installed when the
/// file could not be retrieved.
#[derive(Debug, Clone)]
pub enum RobotsRules {
    /// A successfully fetched robots.txt
    Parsed(ParsedRobots),
    /// Fallback that allows everything
    AllowAll,
}

impl RobotsRules {
    /// Checks if a URL is allowed for the given user agent
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match self {
            Self::Parsed(robots) => robots.is_allowed(url, user_agent),
            Self::AllowAll => true,
        }
    }

    /// Returns the Crawl-delay in seconds that applies to the user agent
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        match self {
            Self::Parsed(robots) => robots.crawl_delay(user_agent),
            Self::AllowAll => None,
        }
    }
}

/// Parsed robots.txt data
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content
    content: String,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The full user agent string; only its product token is matched
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, product_token(user_agent), url)
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// A group naming the agent's product token wins over the `*` group.
    ///
    /// # Returns
    ///
    /// * `Some(f64)` - The crawl delay in seconds
    /// * `None` - If no crawl delay applies
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let token = product_token(user_agent).to_lowercase();

        let mut group_agents: Vec<String> = Vec::new();
        let mut previous_was_agent = false;
        let mut wildcard_delay: Option<f64> = None;
        let mut agent_delay: Option<f64> = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            if key == "user-agent" {
                // Consecutive User-agent lines share one group
                if !previous_was_agent {
                    group_agents.clear();
                }
                group_agents.push(value.to_lowercase());
                previous_was_agent = true;
                continue;
            }
            previous_was_agent = false;

            if key != "crawl-delay" {
                continue;
            }
            let Ok(delay) = value.parse::<f64>() else {
                continue;
            };

            if group_agents.iter().any(|agent| *agent == token) {
                agent_delay.get_or_insert(delay);
            } else if group_agents.iter().any(|agent| agent == "*") {
                wildcard_delay.get_or_insert(delay);
            }
        }

        agent_delay.or(wildcard_delay)
    }
}

/// Extracts the product token (`Name` in `Name/1.0 (...)`)
fn product_token(user_agent: &str) -> &str {
    user_agent
        .split(|c: char| c == '/' || c.is_whitespace())
        .next()
        .unwrap_or("")
}
