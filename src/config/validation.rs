use crate::config::types::CrawlerConfig;
use crate::ConfigError;

/// Upper bound for robots.txt retrieval, in milliseconds
const MAX_ROBOTS_TIMEOUT_MS: u64 = 5000;

/// Validates crawler configuration
pub fn validate(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.timeout < 1 {
        return Err(ConfigError::Validation(
            "timeout must be >= 1ms".to_string(),
        ));
    }

    if config.robots_timeout < 1 || config.robots_timeout > MAX_ROBOTS_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "robots_timeout must be between 1 and {}ms, got {}ms",
            MAX_ROBOTS_TIMEOUT_MS, config.robots_timeout
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
