use crate::config::types::{Config, ExcludeEntry, OutputConfig, RewriteEntry, SeedEntry, UserAgentConfig};
use crate::url::SiteRoot;
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_root(&config.site.root)?;
    validate_output_config(&config.output)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_seeds(&config.seeds)?;
    validate_excludes(&config.excludes)?;
    validate_rewrites(&config.rewrites)?;
    Ok(())
}

/// The root must be an http(s) URL with a host
fn validate_site_root(root: &str) -> Result<(), ConfigError> {
    SiteRoot::parse(root)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site root '{}': {}", root, e)))
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.destination.trim().is_empty() {
        return Err(ConfigError::Validation(
            "destination cannot be empty".to_string(),
        ));
    }

    if let Some(prefix) = &config.remote_prefix {
        if prefix.is_empty() {
            return Err(ConfigError::Validation(
                "remote-prefix cannot be empty; omit it for relative references".to_string(),
            ));
        }
    }

    for (name, path) in [
        ("summary-path", &config.summary_path),
        ("database-path", &config.database_path),
        ("overlay-dir", &config.overlay_dir),
    ] {
        if matches!(path, Some(path) if path.trim().is_empty()) {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    if config.overlay_skip_extension.starts_with('.') {
        return Err(ConfigError::Validation(format!(
            "overlay-skip-extension must not start with '.', got '{}'",
            config.overlay_skip_extension
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Seeds are trusted, so any absolute URL will do
fn validate_seeds(seeds: &[SeedEntry]) -> Result<(), ConfigError> {
    for seed in seeds {
        Url::parse(&seed.url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed.url, e))
        })?;
    }
    Ok(())
}

fn validate_excludes(excludes: &[ExcludeEntry]) -> Result<(), ConfigError> {
    for entry in excludes {
        validate_pattern(&entry.pattern)?;
    }
    Ok(())
}

fn validate_rewrites(rewrites: &[RewriteEntry]) -> Result<(), ConfigError> {
    for entry in rewrites {
        validate_pattern(&entry.pattern)?;
    }
    Ok(())
}

fn validate_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Pattern cannot be empty".to_string(),
        ));
    }

    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))
}
