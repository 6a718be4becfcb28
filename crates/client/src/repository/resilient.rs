//! Resilient repository decorator.
//!
//! Retries failed calls of the wrapped accessor with linear backoff. Only
//! failures whose status classifies as retryable (429 and 5xx) are retried;
//! everything else is returned on the first attempt.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use trialsync_core::resource::{
    CacheMode, Entity, ErrorClass, Patch, ResourceAccessor, ResourceError, ResourceId, Result,
};

/// Retry budget and backoff step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of invocations allowed per call. 0 behaves as 1.
    pub max_retries: u32,
    /// Delay before the second attempt; attempt `n` waits `base_delay * n`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// Resource accessor decorator that retries transient failures.
pub struct ResilientRepository<R> {
    repository: Arc<R>,
    policy: RetryPolicy,
}

impl<R> ResilientRepository<R> {
    pub fn new(repository: Arc<R>, policy: RetryPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    async fn run<V, F, Fut>(&self, resource: &str, operation: &str, mut call: F) -> Result<V>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<V>> + Send,
        V: Send,
    {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1;

        loop {
            let error = match call().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            match error.classify() {
                None => {
                    tracing::warn!(resource, operation, error = %error, "Call failed without a status");
                    return Err(ResourceError::unexpected(&error));
                }
                Some(ErrorClass::Terminal) => {
                    return Err(ResourceError::Rejected {
                        attempts: attempt,
                        source: Box::new(error),
                    });
                }
                Some(ErrorClass::Retryable) if attempt < max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    tracing::warn!(
                        resource,
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Retrying after transient failure"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Some(ErrorClass::Retryable) => {
                    tracing::warn!(resource, operation, attempts = attempt, error = %error, "Retries exhausted");
                    return Err(ResourceError::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(error),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl<T, R> ResourceAccessor<T> for ResilientRepository<R>
where
    T: Entity,
    R: ResourceAccessor<T> + 'static,
{
    async fn list_all(&self, mode: CacheMode) -> Result<Vec<T>> {
        self.run(T::RESOURCE, "list_all", || self.repository.list_all(mode))
            .await
    }

    async fn get_by_id(&self, id: &ResourceId, mode: CacheMode) -> Result<T> {
        self.run(T::RESOURCE, "get_by_id", || {
            self.repository.get_by_id(id, mode)
        })
        .await
    }

    // Retries resend the same patch, so an id set by the caller is reused.
    async fn create(&self, patch: &Patch) -> Result<T> {
        self.run(T::RESOURCE, "create", || self.repository.create(patch))
            .await
    }

    async fn update(&self, id: &ResourceId, patch: &Patch) -> Result<T> {
        self.run(T::RESOURCE, "update", || self.repository.update(id, patch))
            .await
    }

    async fn delete(&self, id: &ResourceId) -> Result<()> {
        self.run(T::RESOURCE, "delete", || self.repository.delete(id))
            .await
    }
}
