//! Cache contracts and pure helpers.
//!
//! Keys are `"<operation marker>:<canonical JSON arguments>"`, so every
//! entry of one operation can be dropped with a `"<marker>:*"` pattern.

mod error;
mod keys;
mod patterns;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{
    cache_key, canonical_json, get_by_id_key, list_all_key, operation_pattern, CacheOperation,
};
pub use patterns::pattern_matches;
pub use serialization::{deserialize_value, serialize_value, SerializationError};
pub use traits::Cache;
