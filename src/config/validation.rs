use crate::config::types::{Config, CrawlerConfig, OutputConfig, RenderConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_render_config(&config.render)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start-url '{}': {}", config.start_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "start-url '{}' must use HTTP or HTTPS",
            config.start_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "start-url '{}' has no host",
            config.start_url
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    // max_depth of 0 is meaningful: only the seed page is visited

    if config.request_timeout < 100 {
        return Err(ConfigError::Validation(format!(
            "request-timeout must be >= 100ms, got {}ms",
            config.request_timeout
        )));
    }

    if let Some(marker) = &config.product_path_marker {
        if marker.trim().is_empty() {
            return Err(ConfigError::Validation(
                "product-path-marker cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.identity.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent identity cannot be empty".to_string(),
        ));
    }

    if config.identity.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(
            "user-agent identity cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates browser session configuration
fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    Url::parse(&config.webdriver_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webdriver-url: {}", e)))?;

    if config.wait_timeout < 100 {
        return Err(ConfigError::Validation(format!(
            "wait-timeout must be >= 100ms, got {}ms",
            config.wait_timeout
        )));
    }

    if config.settle_initial_backoff < 1 {
        return Err(ConfigError::Validation(
            "settle-initial-backoff must be >= 1ms".to_string(),
        ));
    }

    if config.settle_max_backoff < config.settle_initial_backoff {
        return Err(ConfigError::Validation(format!(
            "settle-max-backoff ({}ms) must be >= settle-initial-backoff ({}ms)",
            config.settle_max_backoff, config.settle_initial_backoff
        )));
    }

    if config.settle_timeout < config.settle_initial_backoff {
        return Err(ConfigError::Validation(format!(
            "settle-timeout ({}ms) must be >= settle-initial-backoff ({}ms)",
            config.settle_timeout, config.settle_initial_backoff
        )));
    }

    if config.max_review_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-review-pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
