//! Resource-access contracts.
//!
//! Everything a repository stack needs to agree on: identifiers, the
//! transport envelope, the accessor trait every layer implements, the error
//! taxonomy and its retry classification, and the filter query builder.

mod classify;
mod error;
mod query;
mod traits;
mod types;

pub use classify::{canonical_reason, ErrorClass};
pub use error::{ResourceError, Result, TransportError};
pub use query::{page_request, to_query_string, PageRequest, DEFAULT_PAGE};
pub use traits::{Entity, ResourceAccessor, Transport};
pub use types::{
    AccessMode, CacheMode, Envelope, EnvelopeStatus, Method, Page, Patch, ResourceId,
    TransportRequest,
};
