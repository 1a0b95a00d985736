//! Cache backend trait and error types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to a cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(#[from] redis::RedisError),

    #[error("Invalid key pattern: {0}")]
    InvalidPattern(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Raw key-value store behind the cache-aside accessor.
///
/// Backends store already-serialized strings and report failures honestly;
/// swallowing them is the job of [`crate::infrastructure::cache::CacheService`].
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis with native TTL expiry
/// - [`crate::infrastructure::cache::MemoryCache`] - in-process map with deadlines
/// - [`crate::infrastructure::cache::NullCache`] - always misses
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the stored string for `key`, `None` on miss or expiry.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Removes `key`. Returns whether it existed.
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Removes every key matching the glob `pattern`. Returns how many were removed.
    async fn delete_by_pattern(&self, pattern: &str) -> CacheResult<usize>;

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> bool;

    /// Short backend name for health reports and logs.
    fn name(&self) -> &'static str;
}
