use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// A volatile key-value store with per-entry expiry.
///
/// Values are opaque bytes; callers own the encoding.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value by key. `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value, replacing any previous one. `None` means no expiry.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value. Returns `false` when the key was not present.
    async fn delete(&self, key: &str) -> Result<bool>;
}
