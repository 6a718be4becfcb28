//! Per-resource in-memory cache.
//!
//! Provides a thread-safe in-memory cache with TTL support using tokio
//! synchronization primitives and an LRU eviction policy. Expired entries
//! are removed lazily, on the next read that finds them.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;
use tokio::time::Instant;

use trialsync_core::cache::{pattern_matches, Cache, Result};

/// Stored bytes plus the moment they were written.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    stored_at: Instant,
    ttl: Option<Duration>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl,
        }
    }

    /// An entry is expired once strictly more than `ttl` has elapsed.
    fn is_expired(&self) -> bool {
        self.ttl.is_some_and(|ttl| self.stored_at.elapsed() > ttl)
    }
}

/// In-memory cache implementation with LRU eviction.
///
/// Uses `Arc<RwLock<LruCache>>` for concurrent access; clones share the
/// same store. Time is read from `tokio::time`, so paused-clock tests can
/// drive expiry.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache holding at most `max_entries` values.
    ///
    /// A capacity of 0 is treated as 1.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of entries currently stored, expired ones included.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut store = self.store.write().await;

        let expired = match store.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            store.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.pop(key);
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        let mut store = self.store.write().await;
        let keys_to_delete: Vec<String> = store
            .iter()
            .filter(|(key, _)| pattern_matches(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        for key in keys_to_delete {
            store.pop(&key);
        }
        Ok(())
    }
}
