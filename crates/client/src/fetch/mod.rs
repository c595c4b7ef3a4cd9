//! HTTP retrieval of raw upstream text.
//!
//! ### Retrieval Contract
//! - `Retrieve` performs a GET and reports the status plus body.
//! - Non-success statuses are returned, not raised; callers decide whether a
//!   missing resource is an error.
//! - Connection failures, timeouts and oversized bodies are `Error::Transport`.
//!
//! ### Limits
//! - Request timeout: 20s (configurable)
//! - Max body bytes: 5MB (configurable)
//! - Max redirects: 5
//!
//! Nothing here retries.

#[cfg(any(test, feature = "test-util"))]
pub mod stub;
pub mod url;

use bytes::Bytes;
use mdrelay_core::{AppConfig, Error};
use reqwest::{Client, StatusCode, Url, header};
use std::time::{Duration, Instant};

pub use self::url::{UrlError, canonicalize, join_upstream};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "mdrelay/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "mdrelay/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// Response from a retrieval.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Anything that can GET a URL and hand back status plus body.
#[async_trait::async_trait]
pub trait Retrieve: Send + Sync {
    async fn get(&self, url: &Url) -> Result<FetchResponse, Error>;
}

/// reqwest-backed retrieval client.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }
}

#[async_trait::async_trait]
impl Retrieve for FetchClient {
    async fn get(&self, url: &Url) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "text/markdown, text/plain;q=0.9, */*;q=0.8")
            .send()
            .await
            .map_err(|e| Error::Transport(format!("network error: {}", e)))?;

        let status = response.status();

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::Transport(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::Transport(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} -> {} in {}ms ({} bytes)", url, status.as_u16(), fetch_ms, bytes.len());

        Ok(FetchResponse { url: url.clone(), status, content_type, bytes, fetch_ms })
    }
}
