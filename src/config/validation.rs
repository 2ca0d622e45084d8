use crate::ConfigError;
use reqwest::header::HeaderValue;
use std::time::Duration;
use url::Url;

/// Validates a seed label
pub fn validate_label(label: &str) -> Result<(), ConfigError> {
    if label.trim().is_empty() {
        return Err(ConfigError::Validation(
            "seed label cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates a seed start URL: absolute, HTTP(S), with a host
pub fn validate_start_url(label: &str, start_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start URL '{}' for '{}': {}", start_url, label, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' for '{}' must use HTTP or HTTPS",
            start_url, label
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' for '{}' has no host",
            start_url, label
        )));
    }

    Ok(())
}

/// Validates the per-target pause between fetches
pub fn validate_rate_limit(label: &str, seconds: f64) -> Result<(), ConfigError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "rate_limit_seconds for '{}' must be a non-negative number, got {}",
            label, seconds
        )));
    }

    if Duration::try_from_secs_f64(seconds).is_err() {
        return Err(ConfigError::Validation(format!(
            "rate_limit_seconds for '{}' is too large, got {}",
            label, seconds
        )));
    }
    Ok(())
}

/// Validates that the user agent is non-empty and usable as a header value
pub fn validate_user_agent(label: &str, user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "user_agent for '{}' cannot be empty",
            label
        )));
    }

    if HeaderValue::from_str(user_agent).is_err() {
        return Err(ConfigError::Validation(format!(
            "user_agent for '{}' contains characters not allowed in an HTTP header",
            label
        )));
    }

    Ok(())
}

/// Validates allowed domain suffixes
///
/// Entries are host suffixes, so schemes, paths and whitespace are rejected.
pub fn validate_allowed_domains(label: &str, domains: &[String]) -> Result<(), ConfigError> {
    for domain in domains {
        if domain.is_empty() {
            return Err(ConfigError::InvalidDomain(format!(
                "allowed domain for '{}' cannot be empty",
                label
            )));
        }

        if domain.contains("://") || domain.contains('/') {
            return Err(ConfigError::InvalidDomain(format!(
                "allowed domain '{}' for '{}' must be a host suffix, not a URL",
                domain, label
            )));
        }

        if domain.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidDomain(format!(
                "allowed domain '{}' for '{}' contains whitespace",
                domain, label
            )));
        }
    }
    Ok(())
}
