use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::classify::canonical_reason;
use super::{ResourceError, Result};

/// Identifier of one entity within a resource collection.
///
/// Serialized untagged, so it appears on the wire as a plain JSON string or
/// number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl ResourceId {
    /// Generates a fresh random identifier (UUID v4).
    pub fn generate() -> Self {
        ResourceId::Text(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{n}"),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId::Text(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        ResourceId::Text(value)
    }
}

impl From<Uuid> for ResourceId {
    fn from(value: Uuid) -> Self {
        ResourceId::Text(value.to_string())
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        ResourceId::Number(value)
    }
}

impl From<&ResourceId> for Value {
    fn from(value: &ResourceId) -> Self {
        match value {
            ResourceId::Number(n) => Value::from(*n),
            ResourceId::Text(s) => Value::from(s.as_str()),
        }
    }
}

/// Outcome marker carried by every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// The structured wrapper the API returns for every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "T: Deserialize<'de> + Default")
)]
pub struct Envelope<T> {
    pub status: EnvelopeStatus,
    pub status_code: u16,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: T,
}

impl<T> Envelope<T> {
    /// Creates a success envelope.
    pub fn success(status_code: u16, data: T) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            status_code,
            status_text: canonical_reason(status_code).to_string(),
            message: String::new(),
            data,
        }
    }

    /// Returns true if the envelope reports success with a non-error code.
    pub fn is_success(&self) -> bool {
        self.status == EnvelopeStatus::Success && self.status_code < 400
    }

    /// Returns the most descriptive message the envelope carries.
    pub fn error_message(&self) -> &str {
        if self.message.is_empty() {
            &self.status_text
        } else {
            &self.message
        }
    }
}

impl<T: Default> Envelope<T> {
    /// Creates an error envelope with an empty payload.
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            status_code,
            status_text: canonical_reason(status_code).to_string(),
            message: message.into(),
            data: T::default(),
        }
    }
}

/// A partial entity used as the payload of create and update calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(Map<String, Value>);

impl Patch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, builder style.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field in place, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Builds a patch from any value that serializes to a JSON object.
    pub fn from_serialize<S: Serialize + ?Sized>(value: &S) -> Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ResourceError::Serialization(format!(
                "patch must be a JSON object, got {other}"
            ))),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    /// An empty page, used when a search matches nothing.
    pub fn empty(page: u32, limit: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page,
            limit,
        }
    }
}

/// Whether a read may be answered from the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    #[default]
    Use,
    Bypass,
}

impl CacheMode {
    pub fn uses_cache(self) -> bool {
        matches!(self, CacheMode::Use)
    }
}

/// Which decorator stack backs a resource.
///
/// `Resilient` always includes caching; there is no retry-only stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessMode {
    Cached,
    #[default]
    Resilient,
}

/// HTTP method of a transport request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request handed to the transport.
///
/// `url` is the path below the API base URL, e.g. `/api/patients/42`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

impl TransportRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn put(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            url: url.into(),
            body: Some(body),
        }
    }

    pub fn patch(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Patch,
            url: url.into(),
            body: Some(body),
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            url: url.into(),
            body: None,
        }
    }
}
