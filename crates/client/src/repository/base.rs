//! Base resource accessor.
//!
//! The innermost layer: translates CRUD intents into transport calls and
//! normalizes error replies. It knows nothing about caching or retries.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use trialsync_core::resource::{
    CacheMode, Entity, Envelope, Patch, ResourceAccessor, ResourceError, ResourceId, Result,
    Transport, TransportError, TransportRequest,
};

/// Produces identifiers for newly created entities.
pub type IdGenerator = Arc<dyn Fn() -> ResourceId + Send + Sync>;

/// Returns the collection path for a resource, e.g. `"/api/patients"`.
pub fn resource_root(api_prefix: &str, resource: &str) -> String {
    let prefix = api_prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("/{resource}")
    } else {
        format!("/{prefix}/{resource}")
    }
}

/// Result of a call whose error status the caller maps itself.
enum Reply {
    Data(Value),
    Failed { status: u16, message: String },
}

impl From<Envelope<Value>> for Reply {
    fn from(envelope: Envelope<Value>) -> Self {
        if envelope.is_success() {
            Reply::Data(envelope.data)
        } else {
            Reply::Failed {
                status: envelope.status_code,
                message: envelope.error_message().to_string(),
            }
        }
    }
}

/// Maps CRUD operations onto `"<root>/<resource>[/<id>]"` transport calls.
pub struct BaseRepository<T: Entity> {
    transport: Arc<dyn Transport>,
    root: String,
    ids: IdGenerator,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> BaseRepository<T> {
    /// Creates a base accessor for `T::RESOURCE` under `api_prefix`.
    pub fn new(transport: Arc<dyn Transport>, api_prefix: &str) -> Self {
        Self {
            transport,
            root: resource_root(api_prefix, T::RESOURCE),
            ids: Arc::new(ResourceId::generate),
            _entity: PhantomData,
        }
    }

    /// Replaces the identifier generator used by `create`.
    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Collection URL, e.g. `"/api/patients"`.
    pub fn collection_url(&self) -> &str {
        &self.root
    }

    fn item_url(&self, id: &ResourceId) -> String {
        format!("{}/{}", self.root, id)
    }

    /// Sends a request, turning error statuses into `Reply::Failed`.
    ///
    /// Only errors without a status (network failures) are returned as `Err`.
    async fn exchange(&self, request: TransportRequest) -> Result<Reply> {
        tracing::trace!(method = %request.method, url = %request.url, "Resource request");
        match self.transport.request(request).await {
            Ok(envelope) => Ok(Reply::from(envelope)),
            Err(TransportError::Status {
                status_code,
                status_message,
                message,
            }) => Ok(Reply::Failed {
                status: status_code,
                message: message.unwrap_or(status_message),
            }),
            Err(error) => Err(error.into()),
        }
    }

    fn not_found(&self, id: &ResourceId) -> ResourceError {
        ResourceError::NotFound {
            resource: T::RESOURCE.to_string(),
            id: id.to_string(),
        }
    }
}

fn decode<D: DeserializeOwned>(data: Value) -> Result<D> {
    serde_json::from_value(data).map_err(ResourceError::from)
}

#[async_trait]
impl<T: Entity> ResourceAccessor<T> for BaseRepository<T> {
    async fn list_all(&self, _mode: CacheMode) -> Result<Vec<T>> {
        let request = TransportRequest::get(self.root.clone());
        tracing::trace!(method = %request.method, url = %request.url, "Resource request");

        // Transport errors propagate unchanged here; only envelope errors are mapped.
        match Reply::from(self.transport.request(request).await?) {
            Reply::Data(data) => decode(data),
            Reply::Failed { status, message } => Err(ResourceError::ListFailed {
                resource: T::RESOURCE.to_string(),
                status,
                message,
            }),
        }
    }

    async fn get_by_id(&self, id: &ResourceId, _mode: CacheMode) -> Result<T> {
        match self.exchange(TransportRequest::get(self.item_url(id))).await? {
            Reply::Data(data) => decode(data),
            Reply::Failed { status: 404, .. } => Err(self.not_found(id)),
            Reply::Failed { status, message } => Err(ResourceError::FetchFailed {
                resource: T::RESOURCE.to_string(),
                status,
                message,
            }),
        }
    }

    async fn create(&self, patch: &Patch) -> Result<T> {
        // A caller-supplied id is kept so a repeated create targets the same item.
        let id = match patch.get(T::ID_FIELD) {
            Some(value) => decode::<ResourceId>(value.clone())?,
            None => (self.ids)(),
        };
        let mut payload = patch.clone();
        payload.insert(T::ID_FIELD, Value::from(&id));

        let request = TransportRequest::put(self.item_url(&id), payload.into_value());
        match self.exchange(request).await? {
            Reply::Data(data) => decode(data),
            Reply::Failed { status, message } => Err(ResourceError::CreateFailed {
                resource: T::RESOURCE.to_string(),
                status,
                message,
            }),
        }
    }

    async fn update(&self, id: &ResourceId, patch: &Patch) -> Result<T> {
        let request = TransportRequest::patch(self.item_url(id), patch.clone().into_value());
        match self.exchange(request).await? {
            Reply::Data(data) => decode(data),
            Reply::Failed { status: 404, .. } => Err(self.not_found(id)),
            Reply::Failed { status, message } => Err(ResourceError::UpdateFailed {
                resource: T::RESOURCE.to_string(),
                status,
                message,
            }),
        }
    }

    async fn delete(&self, id: &ResourceId) -> Result<()> {
        match self.exchange(TransportRequest::delete(self.item_url(id))).await? {
            Reply::Data(_) => Ok(()),
            Reply::Failed { status: 404, .. } => Err(self.not_found(id)),
            Reply::Failed { status, message } => Err(ResourceError::DeleteFailed {
                resource: T::RESOURCE.to_string(),
                status,
                message,
            }),
        }
    }
}
