//! In-memory `Retrieve` implementation for tests.
//!
//! Serves canned responses by URL and counts every call, so tests can assert
//! how many outbound fetches a code path made.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use mdrelay_core::Error;
use parking_lot::Mutex;
use reqwest::{StatusCode, Url};

use super::{FetchResponse, Retrieve};

#[derive(Clone)]
enum Canned {
    Body(StatusCode, String),
    Fail(String),
}

/// Canned-response retriever. Unknown URLs answer 404 with an empty body.
#[derive(Clone, Default)]
pub struct StubRetriever {
    routes: Arc<Mutex<HashMap<String, Canned>>>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl StubRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with 200 and `body`.
    pub fn with_body(self, url: &str, body: &str) -> Self {
        self.with_status(url, StatusCode::OK, body)
    }

    pub fn with_status(self, url: &str, status: StatusCode, body: &str) -> Self {
        self.routes.lock().insert(url.to_string(), Canned::Body(status, body.to_string()));
        self
    }

    /// Fail `url` with a transport error.
    pub fn with_failure(self, url: &str, message: &str) -> Self {
        self.routes.lock().insert(url.to_string(), Canned::Fail(message.to_string()));
        self
    }

    /// Sleep before answering, to widen race windows in concurrency tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Total number of `get` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Retrieve for StubRetriever {
    async fn get(&self, url: &Url) -> Result<FetchResponse, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let canned = self.routes.lock().get(url.as_str()).cloned();
        let (status, body) = match canned {
            Some(Canned::Body(status, body)) => (status, body),
            Some(Canned::Fail(message)) => return Err(Error::Transport(message)),
            None => (StatusCode::NOT_FOUND, String::new()),
        };

        Ok(FetchResponse {
            url: url.clone(),
            status,
            content_type: Some("text/plain; charset=utf-8".to_string()),
            bytes: Bytes::from(body),
            fetch_ms: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_serves_and_counts() {
        let stub = StubRetriever::new().with_body("https://example.com/a.md", "# A");

        let hit = stub.get(&Url::parse("https://example.com/a.md").unwrap()).await.unwrap();
        assert_eq!(hit.text(), "# A");

        let miss = stub.get(&Url::parse("https://example.com/b.md").unwrap()).await.unwrap();
        assert_eq!(miss.status, StatusCode::NOT_FOUND);

        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn test_stub_failure() {
        let stub = StubRetriever::new().with_failure("https://example.com/a.md", "unreachable");
        let result = stub.get(&Url::parse("https://example.com/a.md").unwrap()).await;
        assert_eq!(result.unwrap_err(), Error::Transport("unreachable".into()));
    }
}
