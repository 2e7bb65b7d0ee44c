//! Single-slot TTL cache
//!
//! The slideshow feed is cached under a key derived from the current minute,
//! so a new key naturally invalidates the previous entry. The TTL is a
//! backstop for clock-keyed entries that would otherwise outlive their
//! usefulness.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct Entry<T> {
    key: String,
    value: T,
    inserted_at: Instant,
}

/// One cached value guarded by key equality and a fixed TTL.
pub struct TtlCache<T> {
    slot: Mutex<Option<Entry<T>>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
        }
    }

    /// Return the cached value if `key` matches and the entry is fresh.
    pub async fn get(&self, key: &str) -> Option<T> {
        let slot = self.slot.lock().await;
        slot.as_ref()
            .filter(|e| e.key == key && e.inserted_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }

    /// Store a value, replacing whatever was cached before.
    pub async fn put(&self, key: String, value: T) {
        let mut slot = self.slot.lock().await;
        *slot = Some(Entry {
            key,
            value,
            inserted_at: Instant::now(),
        });
    }

    /// Drop the cached entry.
    pub async fn clear(&self) {
        let mut slot = self.slot.lock().await;
        *slot = None;
    }
}
