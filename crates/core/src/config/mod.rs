//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MDRELAY_*)
//! 2. TOML config file (if MDRELAY_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MDRELAY_*)
/// 2. TOML config file (if MDRELAY_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server listens on.
    ///
    /// Set via MDRELAY_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL for raw file retrieval. Proxied paths are appended to it.
    ///
    /// Set via MDRELAY_UPSTREAM_BASE environment variable.
    #[serde(default = "default_upstream_base")]
    pub upstream_base: String,

    /// Browsable "document view" URL prefix replaced by the link rewriter.
    ///
    /// Set via MDRELAY_VIEW_PREFIX environment variable.
    #[serde(default = "default_view_prefix")]
    pub view_prefix: String,

    /// Mount point of the proxy endpoint.
    ///
    /// Set via MDRELAY_PROXY_MOUNT environment variable.
    #[serde(default = "default_proxy_mount")]
    pub proxy_mount: String,

    /// Route segment rewritten links point at.
    ///
    /// Set via MDRELAY_LINK_MOUNT environment variable.
    #[serde(default = "default_link_mount")]
    pub link_mount: String,

    /// Scheme used when building rewrite targets.
    ///
    /// Set via MDRELAY_PUBLIC_SCHEME environment variable.
    #[serde(default = "default_public_scheme")]
    pub public_scheme: String,

    /// Host used for rewrite targets when a request carries no Host header.
    ///
    /// Set via MDRELAY_PUBLIC_HOST environment variable.
    #[serde(default = "default_public_host")]
    pub public_host: String,

    /// Base URL the document loader retrieves `{name}.md` from.
    ///
    /// Set via MDRELAY_DOCS_BASE_URL environment variable.
    #[serde(default = "default_docs_base_url")]
    pub docs_base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via MDRELAY_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via MDRELAY_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via MDRELAY_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether concurrent cache misses for one key share a single fetch.
    ///
    /// Set via MDRELAY_COALESCE_FETCHES environment variable.
    #[serde(default = "default_true")]
    pub coalesce_fetches: bool,

    /// Whether raw HTML embedded in markdown is passed through when rendering.
    ///
    /// Set via MDRELAY_ALLOW_RAW_HTML environment variable.
    #[serde(default)]
    pub allow_raw_html: bool,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".into()
}

fn default_upstream_base() -> String {
    "https://raw.githubusercontent.com/XXXLutz/techstack-tutorial/master".into()
}

fn default_view_prefix() -> String {
    "https://github.com/XXXLutz/techstack-tutorial/blob/master".into()
}

fn default_proxy_mount() -> String {
    "/repo".into()
}

fn default_link_mount() -> String {
    "tutorials".into()
}

fn default_public_scheme() -> String {
    "http".into()
}

fn default_public_host() -> String {
    "localhost:8000".into()
}

fn default_docs_base_url() -> String {
    "http://localhost:8000/repo".into()
}

fn default_user_agent() -> String {
    "mdrelay/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            upstream_base: default_upstream_base(),
            view_prefix: default_view_prefix(),
            proxy_mount: default_proxy_mount(),
            link_mount: default_link_mount(),
            public_scheme: default_public_scheme(),
            public_host: default_public_host(),
            docs_base_url: default_docs_base_url(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            coalesce_fetches: true,
            allow_raw_html: false,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base URL rewritten links point at for a request addressed to `host`.
    ///
    /// Falls back to `public_host` when the request carried no host.
    pub fn link_target(&self, host: Option<&str>) -> String {
        let host = host.filter(|h| !h.is_empty()).unwrap_or(&self.public_host);
        format!("{}://{}/{}", self.public_scheme, host, self.link_mount)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MDRELAY_`
    /// 2. TOML file from `MDRELAY_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MDRELAY_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MDRELAY_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
