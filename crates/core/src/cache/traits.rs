use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Byte-oriented key/value store with per-entry expiry.
///
/// Keys follow the `"<operation>:<canonical args>"` layout produced by
/// [`cache_key`](super::cache_key), which is what `delete_pattern` globs over.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the stored bytes, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores bytes under `key`. `None` keeps the entry until evicted.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Drops every key matching a `*` glob such as `"listAll:*"`.
    async fn delete_pattern(&self, pattern: &str) -> Result<()>;
}
