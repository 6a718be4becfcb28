use thiserror::Error;

/// Failures of a cache backend.
///
/// The cached repository logs these and carries on as if the key were
/// absent, so they never reach repository callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The backend could not be reached at all.
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
    /// The backend was reached but rejected the operation.
    #[error("Cache operation failed on {key}: {reason}")]
    OperationFailed { key: String, reason: String },
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
