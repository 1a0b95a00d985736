//! No-op cache implementation for disabled caching.

use super::backend::{CacheBackend, CacheResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A cache backend that stores nothing.
///
/// Used when Redis is not configured, when the Redis connection fails at
/// startup, or when caching is explicitly disabled. Every read is a miss.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for NullCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> CacheResult<bool> {
        Ok(false)
    }

    async fn delete_by_pattern(&self, _pattern: &str) -> CacheResult<usize> {
        Ok(0)
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
