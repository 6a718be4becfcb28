//! Cached repository decorator.
//!
//! Wraps a `ResourceAccessor` with the cache-aside pattern:
//!
//! - **Reads**: Check cache first, on miss fetch from the wrapped accessor and populate cache
//! - **Writes**: Persist through the wrapped accessor, then invalidate by operation marker
//!
//! A mutation drops every cached listing of the resource, not just the
//! listings that contained the entity.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use trialsync_core::cache::{
    deserialize_value, get_by_id_key, list_all_key, operation_pattern, serialize_value, Cache,
    CacheOperation,
};
use trialsync_core::resource::{CacheMode, Entity, Patch, ResourceAccessor, ResourceId, Result};

/// Default time-to-live for cached reads.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Cached resource accessor decorator.
///
/// Cache failures never fail the caller: they are logged and treated as
/// misses. Errors from the wrapped accessor propagate and leave the cache
/// untouched.
///
/// # Type Parameters
///
/// * `R` - The wrapped accessor
/// * `C` - The cache implementation
pub struct CachedRepository<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
    ttl: Duration,
}

impl<R, C: Cache> CachedRepository<R, C> {
    /// Creates a new cached repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The accessor to cache
    /// * `cache` - The cache implementation, owned by this resource alone
    /// * `ttl` - Time-to-live for cached reads
    pub fn new(repository: Arc<R>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            repository,
            cache,
            ttl,
        }
    }

    /// Creates a cached repository with the default five-minute TTL.
    pub fn with_default_ttl(repository: Arc<R>, cache: Arc<C>) -> Self {
        Self::new(repository, cache, DEFAULT_TTL)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn read<V: DeserializeOwned>(&self, resource: &str, key: &str) -> Option<V> {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match deserialize_value(&bytes) {
                Ok(value) => Some(value),
                Err(err) => {
                    // Undecodable bytes are treated as a miss
                    tracing::warn!(resource, key, error = %err, "Cached value deserialization failed");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(resource, key, error = %err, "Cache read failed");
                None
            }
        }
    }

    async fn write<V: Serialize + Sync + ?Sized>(&self, resource: &str, key: &str, value: &V) {
        let bytes = match serialize_value(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(resource, key, error = %err, "Cache serialization failed");
                return;
            }
        };
        if let Err(err) = self.cache.set(key, &bytes, Some(self.ttl)).await {
            tracing::warn!(resource, key, error = %err, "Failed to populate cache");
        }
    }

    async fn invalidate(&self, resource: &str, operation: CacheOperation) {
        let pattern = operation_pattern(operation);
        if let Err(err) = self.cache.delete_pattern(&pattern).await {
            tracing::warn!(resource, pattern = %pattern, error = %err, "Failed to invalidate cache");
        }
    }
}

#[async_trait]
impl<T, R, C> ResourceAccessor<T> for CachedRepository<R, C>
where
    T: Entity,
    R: ResourceAccessor<T> + 'static,
    C: Cache + 'static,
{
    async fn list_all(&self, mode: CacheMode) -> Result<Vec<T>> {
        let key = list_all_key();

        if mode.uses_cache() {
            if let Some(items) = self.read::<Vec<T>>(T::RESOURCE, &key).await {
                tracing::trace!(resource = T::RESOURCE, "Cache hit for listing");
                return Ok(items);
            }
        }

        tracing::trace!(resource = T::RESOURCE, ?mode, "Cache miss for listing");
        let items = self.repository.list_all(mode).await?;
        self.write(T::RESOURCE, &key, items.as_slice()).await;
        Ok(items)
    }

    async fn get_by_id(&self, id: &ResourceId, mode: CacheMode) -> Result<T> {
        let key = get_by_id_key(id);

        if mode.uses_cache() {
            if let Some(item) = self.read::<T>(T::RESOURCE, &key).await {
                tracing::trace!(resource = T::RESOURCE, id = %id, "Cache hit");
                return Ok(item);
            }
        }

        tracing::trace!(resource = T::RESOURCE, id = %id, ?mode, "Cache miss");
        let item = self.repository.get_by_id(id, mode).await?;
        self.write(T::RESOURCE, &key, &item).await;
        Ok(item)
    }

    async fn create(&self, patch: &Patch) -> Result<T> {
        // 1. Persist through the wrapped accessor
        let created = self.repository.create(patch).await?;

        // 2. Listings no longer reflect the collection
        self.invalidate(T::RESOURCE, CacheOperation::ListAll).await;

        // 3. Cache the new entity under its own key
        let id = created.id();
        self.write(T::RESOURCE, &get_by_id_key(&id), &created).await;

        tracing::debug!(resource = T::RESOURCE, id = %id, "Entity created");
        Ok(created)
    }

    async fn update(&self, id: &ResourceId, patch: &Patch) -> Result<T> {
        let updated = self.repository.update(id, patch).await?;

        self.invalidate(T::RESOURCE, CacheOperation::ListAll).await;
        self.write(T::RESOURCE, &get_by_id_key(id), &updated).await;

        tracing::debug!(resource = T::RESOURCE, id = %id, "Entity updated");
        Ok(updated)
    }

    async fn delete(&self, id: &ResourceId) -> Result<()> {
        self.repository.delete(id).await?;

        for operation in CacheOperation::ALL {
            self.invalidate(T::RESOURCE, operation).await;
        }

        tracing::debug!(resource = T::RESOURCE, id = %id, "Entity deleted");
        Ok(())
    }
}
