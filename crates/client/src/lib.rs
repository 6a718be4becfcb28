//! trialsync_client - Cached, retrying resource repositories for the trialsync API.
//!
//! Every domain repository is a [`ResourceRepository`] over a stack of
//! [`ResourceAccessor`](trialsync_core::resource::ResourceAccessor) layers:
//!
//! ```text
//! ResourceRepository -> ResilientRepository -> CachedRepository -> BaseRepository -> Transport
//! ```

pub mod cache;
pub mod config;
pub mod repositories;
pub mod repository;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use cache::MemoryCache;
pub use config::Config;
pub use repositories::{
    AdverseEventsRepository, AuditsRepository, ConsentsRepository, PatientsRepository,
    Repositories, SitesRepository, TrialsRepository, UsersRepository,
};
pub use repository::{
    BaseRepository, CachedRepository, IdGenerator, ResilientRepository, ResourceRepository,
    RetryPolicy,
};
pub use transport::HttpTransport;
