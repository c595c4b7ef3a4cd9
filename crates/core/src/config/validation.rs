//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { field: field.into(), reason: reason.into() }
    }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `upstream_base`, `view_prefix` or `docs_base_url` is not an absolute http(s) URL
    /// - `proxy_mount` is not of the form `/segment`
    /// - `link_mount` has a leading or trailing `/`
    /// - `public_scheme` is neither `http` nor `https`
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or `public_host` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("upstream_base", &self.upstream_base)?;
        validate_http_url("view_prefix", &self.view_prefix)?;
        validate_http_url("docs_base_url", &self.docs_base_url)?;

        if !self.proxy_mount.starts_with('/') || self.proxy_mount.len() < 2 || self.proxy_mount.ends_with('/') {
            return Err(ConfigError::invalid("proxy_mount", "must look like /segment"));
        }

        if self.link_mount.starts_with('/') || self.link_mount.ends_with('/') {
            return Err(ConfigError::invalid("link_mount", "must not start or end with /"));
        }

        if self.public_scheme != "http" && self.public_scheme != "https" {
            return Err(ConfigError::invalid("public_scheme", "must be http or https"));
        }

        if self.public_host.is_empty() {
            return Err(ConfigError::invalid("public_host", "must not be empty"));
        }

        if self.max_bytes == 0 {
            return Err(ConfigError::invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::invalid("user_agent", "must not be empty"));
        }

        if self.allow_raw_html {
            tracing::warn!("allow_raw_html is enabled; upstream HTML is passed through unsanitized");
        }

        Ok(())
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value).map_err(|e| ConfigError::invalid(field, e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        _ => Err(ConfigError::invalid(field, "must be an absolute http(s) URL")),
    }
}
