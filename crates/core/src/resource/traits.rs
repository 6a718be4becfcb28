use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{CacheMode, Envelope, Patch, ResourceId, Result, TransportError, TransportRequest};

/// A type stored in a resource collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name used in URLs, e.g. `"patients"`.
    const RESOURCE: &'static str;

    /// Field holding the identifier in the wire payload.
    const ID_FIELD: &'static str = "id";

    fn id(&self) -> ResourceId;
}

/// Performs one request against the API.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<Envelope<Value>, TransportError>;
}

/// The five CRUD operations shared by the base accessor and every decorator.
///
/// Decorators wrap another `ResourceAccessor` and call through it for the
/// parts they do not change.
#[async_trait]
pub trait ResourceAccessor<T: Entity>: Send + Sync {
    /// Lists every entity in the collection.
    async fn list_all(&self, mode: CacheMode) -> Result<Vec<T>>;

    /// Gets an entity by its ID.
    async fn get_by_id(&self, id: &ResourceId, mode: CacheMode) -> Result<T>;

    /// Creates a new entity from a partial payload.
    async fn create(&self, patch: &Patch) -> Result<T>;

    /// Updates an existing entity.
    async fn update(&self, id: &ResourceId, patch: &Patch) -> Result<T>;

    /// Deletes an entity by its ID.
    async fn delete(&self, id: &ResourceId) -> Result<()>;
}
