//! Query-string building for filtered listings.

use serde::Serialize;
use serde_json::{Map, Value};
use url::form_urlencoded;

use super::{ResourceError, Result};

/// Page number assumed when the filters do not name one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page coordinates requested by a filter object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

/// Serializes a filter object into a URL-encoded query string.
///
/// Keys are emitted in sorted order, `null` values are skipped, arrays
/// become repeated keys and nested objects are sent as JSON text.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use trialsync_core::resource::to_query_string;
///
/// let query = to_query_string(&json!({"status": "Active", "page": 2})).unwrap();
/// assert_eq!(query, "page=2&status=Active");
/// ```
pub fn to_query_string<F: Serialize + ?Sized>(filters: &F) -> Result<String> {
    let map = filter_object(filters)?;
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for key in keys {
        match &map[key.as_str()] {
            Value::Null => {}
            Value::Array(values) => {
                for value in values {
                    if let Some(text) = scalar_text(value) {
                        serializer.append_pair(key, &text);
                    }
                }
            }
            value => {
                if let Some(text) = scalar_text(value) {
                    serializer.append_pair(key, &text);
                }
            }
        }
    }
    Ok(serializer.finish())
}

/// Reads `page` and `limit` from a filter object, falling back to
/// [`DEFAULT_PAGE`] and `default_limit`.
///
/// Numeric strings are accepted since filters often come from query forms.
pub fn page_request<F: Serialize + ?Sized>(filters: &F, default_limit: u32) -> Result<PageRequest> {
    let map = filter_object(filters)?;
    Ok(PageRequest {
        page: positive_number(map.get("page")).unwrap_or(DEFAULT_PAGE),
        limit: positive_number(map.get("limit")).unwrap_or(default_limit),
    })
}

fn filter_object<F: Serialize + ?Sized>(filters: &F) -> Result<Map<String, Value>> {
    match serde_json::to_value(filters)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(ResourceError::Serialization(format!(
            "filters must be a JSON object, got {other}"
        ))),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn positive_number(value: Option<&Value>) -> Option<u32> {
    let n = match value? {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|n| *n > 0)
}
