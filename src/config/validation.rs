use crate::config::effective::compile_patterns;
use crate::config::types::{Config, CrawlConfig, TransportConfig, TransportKind, UserAgentConfig};
use crate::url::normalize_location;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_transport_config(&config.transport)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates the crawler description
fn validate_scraper_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.name().trim().is_empty() {
        return Err(ConfigError::Validation("name cannot be empty".to_string()));
    }

    normalize_location(config.base_url())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    for name in config
        .html_filters()
        .names()
        .iter()
        .chain(config.text_filters().names())
    {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "filter names cannot be empty".to_string(),
            ));
        }
    }

    let options = config.options();
    compile_patterns(options.skip_patterns.as_deref())?;
    compile_patterns(options.only_patterns.as_deref())?;

    Ok(())
}

/// Validates transport configuration
fn validate_transport_config(config: &TransportConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 64 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-requests must be between 1 and 64, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.kind == TransportKind::File && config.dir.is_none() {
        return Err(ConfigError::Validation(
            "file transport requires a dir".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}
