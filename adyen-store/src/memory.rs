//! In-memory adapters backed by `DashMap`.

use std::time::Duration;

use adyen_types::{Cache, SessionStore};
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::trace;

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// Process-local cache with per-entry expiry.
///
/// Expired entries are dropped on lookup and swept on every save.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn load(&self, id: &str) -> Option<String> {
        let now = Instant::now();
        let hit = self
            .entries
            .get(id)
            .map(|entry| (entry.expires_at > now).then(|| entry.value.clone()));
        match hit {
            Some(Some(value)) => Some(value),
            Some(None) => {
                trace!(id, "cache entry expired");
                self.entries.remove_if(id, |_, entry| entry.expires_at <= now);
                None
            }
            None => None,
        }
    }

    async fn save(&self, id: &str, value: &str, ttl: Duration) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
        self.entries.insert(
            id.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
    }

    async fn remove(&self, id: &str) {
        self.entries.remove(id);
    }
}

/// Checkout session kept in process memory.
#[derive(Default)]
pub struct MemorySession {
    data: DashMap<String, String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySession {
    async fn get(&self, key: &str) -> Option<String> {
        self.data.get(key).map(|v| v.value().clone())
    }

    async fn set(&self, key: &str, value: String) {
        self.data.insert(key.to_string(), value);
    }

    async fn take(&self, key: &str) -> Option<String> {
        self.data.remove(key).map(|(_, v)| v)
    }
}
