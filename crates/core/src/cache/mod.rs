//! Process-lifetime cache for proxied documents.
//!
//! Entries are keyed by canonical upstream URL and hold the rewritten text.
//! There is no expiry and no size bound; a later write for the same key
//! replaces the previous value.
//!
//! - `DocumentCache` is the seam callers depend on, so a bounded or TTL cache
//!   can be swapped in without touching the proxy handler.
//! - `MemoryCache` is the default HashMap-backed implementation.
//! - `KeyedLocks` serializes work per key so concurrent misses can share a
//!   single upstream fetch.

pub mod inflight;
pub mod memory;

use std::sync::Arc;

pub use inflight::KeyedLocks;
pub use memory::MemoryCache;

/// Key/value store for rewritten documents.
#[async_trait::async_trait]
pub trait DocumentCache: Send + Sync {
    /// Look up the cached text for `key`.
    async fn get(&self, key: &str) -> Option<Arc<str>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: String, value: Arc<str>);

    /// Number of cached entries.
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
