//! The per-resource facade domain repositories are built on.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use trialsync_core::resource::{
    page_request, to_query_string, AccessMode, CacheMode, Entity, Page, Patch, ResourceAccessor,
    ResourceError, ResourceId, Result, Transport, TransportError, TransportRequest,
};

use super::base::{BaseRepository, IdGenerator};
use super::cached::CachedRepository;
use super::resilient::ResilientRepository;
use crate::cache::MemoryCache;
use crate::config::Config;

/// Search replies carry a page object; some endpoints answer with a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchReply<T> {
    Page(Page<T>),
    Items(Vec<T>),
}

/// CRUD and filtered search over one resource collection.
///
/// Reads and writes go through the decorator stack chosen by [`AccessMode`];
/// filtered searches hit the transport directly and are never cached.
pub struct ResourceRepository<T: Entity> {
    accessor: Arc<dyn ResourceAccessor<T>>,
    ids: IdGenerator,
    transport: Arc<dyn Transport>,
    root: String,
    mode: AccessMode,
    default_page_limit: u32,
}

impl<T: Entity> ResourceRepository<T> {
    /// Builds the stack for `T::RESOURCE` from configuration.
    pub fn new(transport: Arc<dyn Transport>, config: &Config, mode: AccessMode) -> Self {
        Self::with_id_generator(transport, config, mode, Arc::new(ResourceId::generate))
    }

    /// Like [`ResourceRepository::new`], with a custom id generator for `create`.
    pub fn with_id_generator(
        transport: Arc<dyn Transport>,
        config: &Config,
        mode: AccessMode,
        ids: IdGenerator,
    ) -> Self {
        let base = BaseRepository::<T>::new(transport.clone(), &config.api_prefix);
        let root = base.collection_url().to_string();
        let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
        let cached = CachedRepository::new(Arc::new(base), cache, config.cache_ttl());

        let accessor: Arc<dyn ResourceAccessor<T>> = match mode {
            AccessMode::Cached => Arc::new(cached),
            AccessMode::Resilient => Arc::new(ResilientRepository::new(
                Arc::new(cached),
                config.retry_policy(),
            )),
        };

        Self {
            accessor,
            ids,
            transport,
            root,
            mode,
            default_page_limit: config.default_page_limit,
        }
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub async fn find_all(&self) -> Result<Vec<T>> {
        self.accessor.list_all(CacheMode::Use).await
    }

    /// Lists the collection without consulting the cache.
    pub async fn find_all_fresh(&self) -> Result<Vec<T>> {
        self.accessor.list_all(CacheMode::Bypass).await
    }

    pub async fn find_by_id(&self, id: impl Into<ResourceId>) -> Result<T> {
        self.accessor.get_by_id(&id.into(), CacheMode::Use).await
    }

    /// Fetches one entity without consulting the cache.
    pub async fn find_by_id_fresh(&self, id: impl Into<ResourceId>) -> Result<T> {
        self.accessor.get_by_id(&id.into(), CacheMode::Bypass).await
    }

    /// Creates an entity under a freshly generated id.
    ///
    /// The id is fixed before the first attempt, so a retried create PUTs the
    /// same URL again. A patch that already names an id keeps it.
    pub async fn create(&self, patch: &Patch) -> Result<T> {
        if patch.get(T::ID_FIELD).is_some() {
            return self.accessor.create(patch).await;
        }
        let mut payload = patch.clone();
        payload.insert(T::ID_FIELD, &(self.ids)());
        self.accessor.create(&payload).await
    }

    pub async fn update(&self, id: impl Into<ResourceId>, patch: &Patch) -> Result<T> {
        self.accessor.update(&id.into(), patch).await
    }

    pub async fn delete(&self, id: impl Into<ResourceId>) -> Result<()> {
        self.accessor.delete(&id.into()).await
    }

    /// Runs a filtered, paginated search.
    ///
    /// A 404 answer means nothing matched and yields an empty page carrying
    /// the requested `page` and `limit`.
    pub async fn find_with_filters<F>(&self, filters: &F) -> Result<Page<T>>
    where
        F: Serialize + Sync + ?Sized,
    {
        let requested = page_request(filters, self.default_page_limit)?;
        let query = to_query_string(filters)?;
        let url = if query.is_empty() {
            self.root.clone()
        } else {
            format!("{}?{}", self.root, query)
        };

        tracing::trace!(resource = T::RESOURCE, url = %url, "Filtered search");
        let (status, message) = match self.transport.request(TransportRequest::get(url)).await {
            Ok(envelope) if envelope.is_success() => {
                return match serde_json::from_value::<SearchReply<T>>(envelope.data)? {
                    SearchReply::Page(page) => Ok(page),
                    SearchReply::Items(items) => Ok(Page {
                        total: items.len() as u64,
                        items,
                        page: requested.page,
                        limit: requested.limit,
                    }),
                };
            }
            Ok(envelope) => (envelope.status_code, envelope.error_message().to_string()),
            Err(error @ TransportError::Network(_)) => return Err(error.into()),
            Err(error) => (
                error.status_code().unwrap_or_default(),
                error.message().to_string(),
            ),
        };

        if status == 404 {
            tracing::trace!(resource = T::RESOURCE, "No records matched filters");
            return Ok(Page::empty(requested.page, requested.limit));
        }
        Err(ResourceError::FetchFailed {
            resource: T::RESOURCE.to_string(),
            status,
            message,
        })
    }
}

impl<T: Entity> std::fmt::Debug for ResourceRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRepository")
            .field("resource", &T::RESOURCE)
            .field("root", &self.root)
            .field("mode", &self.mode)
            .finish()
    }
}
