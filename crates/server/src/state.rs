//! Application state management.
//!
//! Every service is constructed once here and shared by the route handlers.

use std::sync::Arc;

use mdrelay_client::{DocumentLoader, MarkdownRenderer, Retrieve};
use mdrelay_core::{AppConfig, DocumentCache, Error};

use crate::proxy::ProxyHandler;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    cache: Arc<dyn DocumentCache>,
    proxy: ProxyHandler,
    loader: DocumentLoader,
    renderer: MarkdownRenderer,
}

impl AppState {
    /// Create the application state.
    ///
    /// The proxy and the document loader share `fetcher`.
    pub fn new(config: AppConfig, cache: Arc<dyn DocumentCache>, fetcher: Arc<dyn Retrieve>) -> Result<Self, Error> {
        let proxy = ProxyHandler::new(&config, cache.clone(), fetcher.clone());
        let loader = DocumentLoader::new(fetcher, &config.docs_base_url)?;
        let renderer = MarkdownRenderer::with_raw_html(config.allow_raw_html);

        Ok(Self { inner: Arc::new(AppStateInner { config, cache, proxy, loader, renderer }) })
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn cache(&self) -> &dyn DocumentCache {
        self.inner.cache.as_ref()
    }

    pub fn proxy(&self) -> &ProxyHandler {
        &self.inner.proxy
    }

    pub fn loader(&self) -> &DocumentLoader {
        &self.inner.loader
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.inner.renderer
    }
}
