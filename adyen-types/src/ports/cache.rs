//! Application cache port.

use std::time::Duration;

/// A string cache with per-entry expiry.
#[async_trait::async_trait]
pub trait Cache: Send + Sync {
    /// Returns the cached value, if present and not expired.
    async fn load(&self, id: &str) -> Option<String>;

    /// Stores `value` under `id` for `ttl`.
    async fn save(&self, id: &str, value: &str, ttl: Duration);

    async fn remove(&self, id: &str);
}
