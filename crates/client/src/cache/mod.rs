//! Cache backend implementations.
//!
//! Provides the concrete implementation of the `Cache` trait defined in
//! `trialsync_core::cache`. Each resource stack owns its own instance; no
//! cache is shared between resources or processes.

mod memory;

pub use memory::MemoryCache;
