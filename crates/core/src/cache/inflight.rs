//! Per-key locks for coalescing concurrent cache misses.
//!
//! A task that misses the cache takes the key's lock, checks the cache again
//! and only then fetches. Tasks queued behind it find the entry on their
//! second check. Lock slots are removed once no task holds or awaits them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;

/// A map of async mutexes created on demand, one per key.
#[derive(Default)]
pub struct KeyedLocks {
    slots: Mutex<HashMap<String, Slot>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn lock(&self, key: &str) -> KeyGuard<'_> {
        let slot = self.slots.lock().entry(key.to_string()).or_default().clone();
        let guard = slot.clone().lock_owned().await;

        KeyGuard { owner: self, key: key.to_string(), slot, guard: Some(guard) }
    }

    /// Number of keys with a holder or waiter.
    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.slots.lock().len()
    }
}

/// Exclusive access to one key; released on drop.
pub struct KeyGuard<'a> {
    owner: &'a KeyedLocks,
    key: String,
    slot: Slot,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        let mut slots = self.owner.slots.lock();
        drop(self.guard.take());

        // Remaining references: the map's and ours.
        if Arc::strong_count(&self.slot) == 2 {
            slots.remove(&self.key);
        }
    }
}
