use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_sections(&config.sections)?;
    validate_site(&config.site)?;
    validate_crawler(&config.crawler)?;
    validate_output(&config.output)?;
    Ok(())
}

/// Validates the section list: non-empty, url-safe names, no duplicates
fn validate_sections(sections: &[String]) -> Result<(), ConfigError> {
    if sections.is_empty() {
        return Err(ConfigError::Validation(
            "at least one section must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for section in sections {
        if section.is_empty() {
            return Err(ConfigError::Validation(
                "section names cannot be empty".to_string(),
            ));
        }

        if !section
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::Validation(format!(
                "section name must contain only alphanumeric characters, '_' and '-', got '{}'",
                section
            )));
        }

        if !seen.insert(section.as_str()) {
            return Err(ConfigError::Validation(format!(
                "section '{}' is listed twice",
                section
            )));
        }
    }

    Ok(())
}

/// Validates the site configuration
fn validate_site(site: &SiteConfig) -> Result<(), ConfigError> {
    let root = Url::parse(&site.root_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("invalid root-url: {}", e)))?;

    if root.scheme() != "http" && root.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "root-url must use http or https, got '{}'",
            root.scheme()
        )));
    }

    if root.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(
            "root-url has no host".to_string(),
        ));
    }

    if site.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the crawler configuration
fn validate_crawler(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // retry-delay-seconds may be 0: useful for tests and dry environments.

    if config.request_timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-seconds must be >= 1, got {}",
            config.request_timeout_seconds
        )));
    }

    Ok(())
}

/// Validates the output configuration
fn validate_output(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "data-dir cannot be empty".to_string(),
        ));
    }

    if config.export_dir.is_empty() {
        return Err(ConfigError::Validation(
            "export-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
