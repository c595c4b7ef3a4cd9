//! Proxy request handling.
//!
//! Serves upstream markdown through the document cache: validate the file
//! type, build the canonical upstream URL, answer from cache on a hit,
//! otherwise fetch, rewrite view links and store the result. Failures are
//! never cached and never retried.

use std::sync::Arc;

use mdrelay_client::fetch::join_upstream;
use mdrelay_client::{LinkRewriter, Retrieve};
use mdrelay_core::{AppConfig, DocumentCache, Error, KeyedLocks};

/// Extensions the proxy serves, compared case-insensitively.
const ALLOWED_EXTENSIONS: [&str; 2] = [".md", ".markdown"];

/// Reject paths that do not name a markdown file.
///
/// A `?` or `#` would turn the tail of the path into a query or fragment
/// once joined onto the upstream base, so both are rejected outright.
pub fn validate_file_type(path: &str) -> Result<(), Error> {
    let lower = path.to_lowercase();
    if !lower.contains(['?', '#']) && ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        Ok(())
    } else {
        Err(Error::InvalidFileType(path.to_string()))
    }
}

/// Composes fetcher, cache and rewriter to serve proxied documents.
pub struct ProxyHandler {
    cache: Arc<dyn DocumentCache>,
    fetcher: Arc<dyn Retrieve>,
    rewriter: LinkRewriter,
    locks: Option<KeyedLocks>,
    upstream_base: String,
}

impl ProxyHandler {
    pub fn new(config: &AppConfig, cache: Arc<dyn DocumentCache>, fetcher: Arc<dyn Retrieve>) -> Self {
        Self {
            cache,
            fetcher,
            rewriter: LinkRewriter::new(config.view_prefix.clone()),
            locks: config.coalesce_fetches.then(KeyedLocks::new),
            upstream_base: config.upstream_base.clone(),
        }
    }

    /// Serve the document at `path` (mount prefix already stripped).
    ///
    /// `link_target` replaces the upstream view prefix in freshly fetched
    /// text. Cached text keeps the target it was first rewritten with.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidFileType` / `Error::InvalidUrl` before any fetch
    /// - `Error::Transport` when the fetch fails
    /// - `Error::UpstreamStatus` when upstream answers non-success
    pub async fn serve(&self, path: &str, link_target: &str) -> Result<Arc<str>, Error> {
        validate_file_type(path)?;
        let url = join_upstream(&self.upstream_base, path)?;
        if url.query().is_some() || validate_file_type(url.path()).is_err() {
            return Err(Error::InvalidFileType(path.to_string()));
        }
        let key = url.to_string();

        if let Some(text) = self.cache.get(&key).await {
            tracing::debug!(url = %key, "cache hit");
            return Ok(text);
        }

        let _guard = match &self.locks {
            Some(locks) => {
                let guard = locks.lock(&key).await;
                if let Some(text) = self.cache.get(&key).await {
                    tracing::debug!(url = %key, "cache filled while waiting");
                    return Ok(text);
                }
                Some(guard)
            }
            None => None,
        };

        tracing::info!(url = %key, "cache miss, fetching upstream");
        let response = self.fetcher.get(&url).await?;

        if !response.is_success() {
            return Err(Error::UpstreamStatus(response.status.as_u16()));
        }

        let raw = response.text();
        let links = self.rewriter.occurrences(&raw);
        let text: Arc<str> = Arc::from(self.rewriter.rewrite(&raw, link_target));

        tracing::info!(
            url = %key,
            content_type = response.content_type.as_deref().unwrap_or("-"),
            fetch_ms = response.fetch_ms,
            bytes = text.len(),
            links,
            "cached upstream document"
        );
        self.cache.put(key, text.clone()).await;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use mdrelay_client::fetch::stub::StubRetriever;
    use mdrelay_core::MemoryCache;
    use std::time::Duration;

    const UPSTREAM: &str = "https://raw.githubusercontent.com/XXXLutz/techstack-tutorial/master";
    const VIEW: &str = "https://github.com/XXXLutz/techstack-tutorial/blob/master";
    const TARGET: &str = "http://localhost:8000/tutorials";

    fn handler(config: &AppConfig, stub: &StubRetriever, cache: &MemoryCache) -> ProxyHandler {
        ProxyHandler::new(config, Arc::new(cache.clone()), Arc::new(stub.clone()))
    }

    #[test]
    fn test_validate_file_type() {
        assert!(matches!(validate_file_type("notes.txt"), Err(Error::InvalidFileType(_))));
        assert!(validate_file_type("notes.md").is_ok());
        assert!(validate_file_type("NOTES.MARKDOWN").is_ok());
        assert!(validate_file_type("/dir/Readme.Md").is_ok());
        assert!(validate_file_type("/notes.cmd").is_err());
        assert!(validate_file_type("/notes.md.txt").is_err());
        assert!(validate_file_type("/md").is_err());
        assert!(validate_file_type("/package.json#.md").is_err());
        assert!(validate_file_type("/package.json?x.md").is_err());
    }

    #[tokio::test]
    async fn test_query_or_fragment_in_path_never_fetches() {
        let stub = StubRetriever::new().with_body(&format!("{UPSTREAM}/package.json"), "{\"name\":\"secret\"}");
        let cache = MemoryCache::new();
        let proxy = handler(&AppConfig::default(), &stub, &cache);

        for path in ["/package.json#.md", "/package.json?x.md", "/package.json?raw=1&x.md"] {
            let result = proxy.serve(path, TARGET).await;
            assert_eq!(result.unwrap_err(), Error::InvalidFileType(path.into()), "path {path}");
        }
        assert_eq!(stub.calls(), 0);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalid_file_type_never_fetches() {
        let stub = StubRetriever::new();
        let cache = MemoryCache::new();
        let proxy = handler(&AppConfig::default(), &stub, &cache);

        let result = proxy.serve("/notes.txt", TARGET).await;
        assert_eq!(result.unwrap_err(), Error::InvalidFileType("/notes.txt".into()));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_escaping_path_never_fetches() {
        let stub = StubRetriever::new();
        let cache = MemoryCache::new();
        let proxy = handler(&AppConfig::default(), &stub, &cache);

        let result = proxy.serve("/../../../evil/repo/master/README.md", TARGET).await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_miss_fetches_rewrites_and_caches() {
        let url = format!("{UPSTREAM}/README.md");
        let stub = StubRetriever::new().with_body(&url, &format!("# Tutorial\n\n[Next]({VIEW}/02/README.md)\n"));
        let cache = MemoryCache::new();
        let proxy = handler(&AppConfig::default(), &stub, &cache);

        let text = proxy.serve("/README.md", TARGET).await.unwrap();
        assert_eq!(&*text, "# Tutorial\n\n[Next](http://localhost:8000/tutorials/02/README.md)\n");
        assert_eq!(cache.get(&url).await.as_deref(), Some(&*text));
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_repeated_requests_fetch_once() {
        let url = format!("{UPSTREAM}/docs/guide.md");
        let stub = StubRetriever::new().with_body(&url, "# Guide\n");
        let cache = MemoryCache::new();
        let proxy = handler(&AppConfig::default(), &stub, &cache);

        for _ in 0..5 {
            let text = proxy.serve("/docs/guide.md", TARGET).await.unwrap();
            assert_eq!(&*text, "# Guide\n");
        }
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_keeps_first_target() {
        let url = format!("{UPSTREAM}/a.md");
        let stub = StubRetriever::new().with_body(&url, &format!("{VIEW}/b.md"));
        let cache = MemoryCache::new();
        let proxy = handler(&AppConfig::default(), &stub, &cache);

        proxy.serve("/a.md", "http://first.example/tutorials").await.unwrap();
        let text = proxy.serve("/a.md", "http://second.example/tutorials").await.unwrap();
        assert_eq!(&*text, "http://first.example/tutorials/b.md");
    }

    #[tokio::test]
    async fn test_transport_failure_not_cached() {
        let url = format!("{UPSTREAM}/down.md");
        let stub = StubRetriever::new().with_failure(&url, "connection refused");
        let cache = MemoryCache::new();
        let proxy = handler(&AppConfig::default(), &stub, &cache);

        for _ in 0..2 {
            let result = proxy.serve("/down.md", TARGET).await;
            assert_eq!(result.unwrap_err(), Error::Transport("connection refused".into()));
        }
        assert_eq!(stub.calls(), 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_upstream_status_not_cached() {
        let url = format!("{UPSTREAM}/gone.md");
        let stub = StubRetriever::new().with_status(&url, StatusCode::NOT_FOUND, "404: Not Found");
        let cache = MemoryCache::new();
        let proxy = handler(&AppConfig::default(), &stub, &cache);

        let result = proxy.serve("/gone.md", TARGET).await;
        assert_eq!(result.unwrap_err(), Error::UpstreamStatus(404));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let url = format!("{UPSTREAM}/slow.md");
        let stub = StubRetriever::new()
            .with_body(&url, "# Slow\n")
            .with_delay(Duration::from_millis(20));
        let cache = MemoryCache::new();
        let proxy = Arc::new(handler(&AppConfig::default(), &stub, &cache));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let proxy = proxy.clone();
                tokio::spawn(async move { proxy.serve("/slow.md", TARGET).await })
            })
            .collect();

        for task in tasks {
            assert_eq!(&*task.await.unwrap().unwrap(), "# Slow\n");
        }
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_without_coalescing_stay_consistent() {
        let url = format!("{UPSTREAM}/slow.md");
        let stub = StubRetriever::new()
            .with_body(&url, "# Slow\n")
            .with_delay(Duration::from_millis(20));
        let cache = MemoryCache::new();
        let config = AppConfig { coalesce_fetches: false, ..Default::default() };
        let proxy = Arc::new(handler(&config, &stub, &cache));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let proxy = proxy.clone();
                tokio::spawn(async move { proxy.serve("/slow.md", TARGET).await })
            })
            .collect();

        for task in tasks {
            assert_eq!(&*task.await.unwrap().unwrap(), "# Slow\n");
        }
        assert!(stub.calls() >= 1);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(&url).await.as_deref(), Some("# Slow\n"));
    }
}
