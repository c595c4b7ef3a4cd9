//! In-memory document cache.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::DocumentCache;

/// HashMap-backed cache shared behind a tokio RwLock.
///
/// Cloning yields another handle to the same map.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, Arc<str>>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DocumentCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<Arc<str>> {
        self.entries.read().await.get(key).cloned()
    }

    async fn put(&self, key: String, value: Arc<str>) {
        tracing::debug!(key = %key, bytes = value.len(), "cache put");
        self.entries.write().await.insert(key, value);
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
