use serde::Serialize;
use serde_json::{Map, Value};

use crate::resource::ResourceId;

use super::SerializationError;

/// Operations whose results (or invalidation scopes) live in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOperation {
    ListAll,
    GetById,
    Create,
    Update,
}

impl CacheOperation {
    /// Every operation marker, in the order a full invalidation drops them.
    pub const ALL: [CacheOperation; 4] = [
        CacheOperation::ListAll,
        CacheOperation::GetById,
        CacheOperation::Create,
        CacheOperation::Update,
    ];

    /// The key prefix for this operation. Never contains `:`.
    pub fn marker(self) -> &'static str {
        match self {
            CacheOperation::ListAll => "listAll",
            CacheOperation::GetById => "getById",
            CacheOperation::Create => "create",
            CacheOperation::Update => "update",
        }
    }
}

/// Returns the cache key for an operation and its arguments.
///
/// Arguments are encoded as canonical JSON, so `{"a":1,"b":2}` and
/// `{"b":2,"a":1}` share a key while any differing field produces a new one.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use trialsync_core::cache::{cache_key, CacheOperation};
///
/// let a = cache_key(CacheOperation::ListAll, &json!({"status": "Active", "page": 2})).unwrap();
/// let b = cache_key(CacheOperation::ListAll, &json!({"page": 2, "status": "Active"})).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a, r#"listAll:{"page":2,"status":"Active"}"#);
/// ```
pub fn cache_key<A: Serialize + ?Sized>(
    operation: CacheOperation,
    args: &A,
) -> Result<String, SerializationError> {
    let value = serde_json::to_value(args)
        .map_err(|e| SerializationError::SerializeFailed(e.to_string()))?;
    Ok(format!("{}:{}", operation.marker(), canonical_json(&value)))
}

/// Returns the cache key for the full collection listing.
pub fn list_all_key() -> String {
    format!("{}:{{}}", CacheOperation::ListAll.marker())
}

/// Returns the cache key for a single entity.
pub fn get_by_id_key(id: &ResourceId) -> String {
    let mut args = Map::new();
    args.insert("id".to_string(), Value::from(id));
    format!(
        "{}:{}",
        CacheOperation::GetById.marker(),
        Value::Object(args)
    )
}

/// Returns the pattern matching every key of one operation.
pub fn operation_pattern(operation: CacheOperation) -> String {
    format!("{}:*", operation.marker())
}

/// Encodes a JSON value with object keys sorted at every level.
pub fn canonical_json(value: &Value) -> String {
    sorted(value).to_string()
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sorted(v)))
                    .collect(),
            )
        }
        Value::Array(values) => Value::Array(values.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
