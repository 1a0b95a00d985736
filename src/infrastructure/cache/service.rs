//! Cache-aside accessor.
//!
//! [`CacheService`] layers JSON serialization, a default TTL and fail-open
//! error handling over any [`CacheBackend`]. The database stays the source of
//! truth: a broken cache only ever costs a round trip, never a request.

use super::backend::CacheBackend;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Expiry applied when a caller does not pass one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Read-through / write-through helper over a shared cache backend.
///
/// Cheap to clone; clones share the same backend.
///
/// `get_or_compute` is not atomic: two requests missing the same key at the
/// same time both run their producer and both write the result.
#[derive(Clone)]
pub struct CacheService {
    backend: Arc<dyn CacheBackend>,
    default_ttl: Duration,
}

impl CacheService {
    pub fn new(backend: Arc<dyn CacheBackend>, default_ttl: Duration) -> Self {
        Self {
            backend,
            default_ttl,
        }
    }

    /// Backed by [`super::NullCache`]; every read misses.
    pub fn disabled() -> Self {
        Self::new(Arc::new(super::NullCache::new()), DEFAULT_TTL)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the cached value for `key`.
    ///
    /// Misses, store failures and values that no longer deserialize into `T`
    /// all come back as `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "cache miss");
                metrics::counter!("cache_misses_total").increment(1);
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "cache get failed");
                metrics::counter!("cache_errors_total", "op" => "get").increment(1);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "cache hit");
                metrics::counter!("cache_hits_total").increment(1);
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %e, "cached value failed to deserialize");
                metrics::counter!("cache_errors_total", "op" => "decode").increment(1);
                None
            }
        }
    }

    /// Serializes `value` and stores it, expiring after `ttl` (default one hour).
    ///
    /// Best-effort: failures are logged and dropped.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "value failed to serialize for cache");
                return;
            }
        };

        let ttl = ttl.unwrap_or(self.default_ttl);
        if let Err(e) = self.backend.set(key, &raw, ttl).await {
            warn!(key, error = %e, "cache set failed");
            metrics::counter!("cache_errors_total", "op" => "set").increment(1);
        } else {
            debug!(key, ttl_secs = ttl.as_secs(), "cache set");
        }
    }

    /// Removes a single key. Best-effort.
    pub async fn delete(&self, key: &str) {
        if let Err(e) = self.backend.delete(key).await {
            warn!(key, error = %e, "cache delete failed");
            metrics::counter!("cache_errors_total", "op" => "delete").increment(1);
        }
    }

    /// Removes every key matching the glob `pattern`.
    ///
    /// Returns how many keys were removed; `0` when the backend fails.
    pub async fn delete_by_pattern(&self, pattern: &str) -> usize {
        match self.backend.delete_by_pattern(pattern).await {
            Ok(removed) => {
                debug!(pattern, removed, "cache invalidated");
                removed
            }
            Err(e) => {
                warn!(pattern, error = %e, "cache pattern delete failed");
                metrics::counter!("cache_errors_total", "op" => "delete_pattern").increment(1);
                0
            }
        }
    }

    /// Returns the cached value, or runs `producer`, caches a truthy result and
    /// returns it.
    ///
    /// Producer errors propagate and nothing is cached.
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        producer: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get::<T>(key).await {
            return Ok(cached);
        }

        let value = producer().await?;

        match serde_json::to_value(&value) {
            Ok(json) if is_truthy(&json) => self.set(key, &json, ttl).await,
            Ok(_) => debug!(key, "falsy value not cached"),
            Err(e) => warn!(key, error = %e, "value failed to serialize for cache"),
        }

        Ok(value)
    }

    pub async fn health_check(&self) -> bool {
        self.backend.health_check().await
    }
}

/// `null`, `false`, `0` and `""` are falsy; everything else, empty
/// collections included, is worth caching.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::{CacheError, CacheResult, MemoryCache};
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Product {
        id: i64,
        name: String,
    }

    struct FailingBackend;

    #[async_trait]
    impl CacheBackend for FailingBackend {
        async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            Err(CacheError::ConnectionError("down".into()))
        }
        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
            Err(CacheError::ConnectionError("down".into()))
        }
        async fn delete(&self, _key: &str) -> CacheResult<bool> {
            Err(CacheError::ConnectionError("down".into()))
        }
        async fn delete_by_pattern(&self, _pattern: &str) -> CacheResult<usize> {
            Err(CacheError::ConnectionError("down".into()))
        }
        async fn health_check(&self) -> bool {
            false
        }
        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn memory_cache() -> (CacheService, Arc<MemoryCache>) {
        let backend = Arc::new(MemoryCache::new());
        (CacheService::new(backend.clone(), DEFAULT_TTL), backend)
    }

    fn aspirin() -> Product {
        Product {
            id: 1,
            name: "Aspirin".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_after_set_returns_value() {
        let (cache, _) = memory_cache();
        cache.set("products:1:id:1", &aspirin(), None).await;

        assert_eq!(cache.get::<Product>("products:1:id:1").await, Some(aspirin()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_ttl_is_one_hour() {
        let (cache, _) = memory_cache();
        cache.set("k", &aspirin(), None).await;

        tokio::time::advance(Duration::from_secs(3599)).await;
        assert!(cache.get::<Product>("k").await.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get::<Product>("k").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_ttl_is_honoured() {
        let (cache, _) = memory_cache();
        cache
            .set("k", &aspirin(), Some(Duration::from_secs(5)))
            .await;

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(cache.get::<Product>("k").await.is_none());
    }

    #[tokio::test]
    async fn test_undeserializable_value_is_a_miss() {
        let (cache, backend) = memory_cache();
        backend.set("k", "{not json", DEFAULT_TTL).await.unwrap();
        assert!(cache.get::<Product>("k").await.is_none());

        cache.set("k", &json!({ "other": true }), None).await;
        assert!(cache.get::<Product>("k").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_key() {
        let (cache, _) = memory_cache();
        cache.set("k", &1, None).await;
        cache.delete("k").await;
        assert!(cache.get::<i32>("k").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_by_pattern_removes_exactly_matches() {
        let (cache, _) = memory_cache();
        cache.set("products:1:id:1", &1, None).await;
        cache.set("products:1:list:1:25:", &2, None).await;
        cache.set("products:10:id:1", &3, None).await;
        cache.set("orders:1:list", &4, None).await;

        assert_eq!(cache.delete_by_pattern("products:1:*").await, 2);
        assert!(cache.get::<i32>("products:1:id:1").await.is_none());
        assert!(cache.get::<i32>("products:1:list:1:25:").await.is_none());
        assert_eq!(cache.get::<i32>("products:10:id:1").await, Some(3));
        assert_eq!(cache.get::<i32>("orders:1:list").await, Some(4));
    }

    #[tokio::test]
    async fn test_get_or_compute_runs_producer_on_miss_only() {
        let (cache, _) = memory_cache();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value: Result<Product, ProducerError> = cache
                .get_or_compute("products:1:id:1", None, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(aspirin())
                })
                .await;
            assert_eq!(value.unwrap(), aspirin());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_compute_returns_cached_value_over_producer() {
        let (cache, _) = memory_cache();
        cache.set("k", &aspirin(), None).await;

        let value: Result<Product, ProducerError> = cache
            .get_or_compute("k", None, || async {
                Ok(Product {
                    id: 2,
                    name: "Fresh".to_string(),
                })
            })
            .await;

        assert_eq!(value.unwrap(), aspirin());
    }

    #[tokio::test]
    async fn test_get_or_compute_does_not_cache_falsy_results() {
        let (cache, backend) = memory_cache();

        let none: Result<Option<Product>, ProducerError> =
            cache.get_or_compute("a", None, || async { Ok(None) }).await;
        assert_eq!(none.unwrap(), None);

        let zero: Result<i64, ProducerError> =
            cache.get_or_compute("b", None, || async { Ok(0) }).await;
        assert_eq!(zero.unwrap(), 0);

        let empty: Result<Vec<i64>, ProducerError> =
            cache.get_or_compute("c", None, || async { Ok(vec![]) }).await;
        assert!(empty.unwrap().is_empty());

        assert!(backend.get("a").await.unwrap().is_none());
        assert!(backend.get("b").await.unwrap().is_none());
        // Empty lists are truthy and cached.
        assert_eq!(backend.get("c").await.unwrap(), Some("[]".to_string()));
    }

    #[tokio::test]
    async fn test_get_or_compute_propagates_producer_error() {
        let (cache, backend) = memory_cache();

        let result: Result<Product, ProducerError> = cache
            .get_or_compute("k", None, || async { Err(ProducerError) })
            .await;

        assert!(result.is_err());
        assert!(backend.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_backend_failures_fail_open() {
        let cache = CacheService::new(Arc::new(FailingBackend), DEFAULT_TTL);

        cache.set("k", &aspirin(), None).await;
        assert!(cache.get::<Product>("k").await.is_none());
        cache.delete("k").await;
        assert_eq!(cache.delete_by_pattern("*").await, 0);

        let value: Result<Product, ProducerError> = cache
            .get_or_compute("k", None, || async { Ok(aspirin()) })
            .await;
        assert_eq!(value.unwrap(), aspirin());
        assert!(!cache.health_check().await);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[derive(Debug)]
    struct ProducerError;
}
