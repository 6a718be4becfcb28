//! The resource accessor stack.
//!
//! - [`BaseRepository`]: maps CRUD intents to transport calls
//! - [`CachedRepository`]: cache-aside reads, write-through invalidation
//! - [`ResilientRepository`]: bounded retry with linear backoff
//! - [`ResourceRepository`]: the facade domain repositories are built on
//!
//! Every layer implements `ResourceAccessor<T>`, so decorators compose by
//! wrapping rather than inheriting.

mod base;
mod cached;
mod facade;
mod resilient;

pub use base::{resource_root, BaseRepository, IdGenerator};
pub use cached::CachedRepository;
pub use facade::ResourceRepository;
pub use resilient::{ResilientRepository, RetryPolicy};
