//! trialsync_core - Functional core for the trialsync resource-access layer.
//!
//! Pure types and functions only: resource identifiers, envelopes, errors and
//! their classification, cache-key derivation and the clinical domain types.
//! All I/O lives in `trialsync_client`.

pub mod cache;
pub mod clinical;
pub mod resource;
