//! Caching layer.
//!
//! [`CacheService`] is the cache-aside accessor services talk to. It sits on a
//! [`CacheBackend`] with three implementations:
//!
//! - [`RedisCache`] - production Redis-backed store
//! - [`MemoryCache`] - in-process store for single instances and tests
//! - [`NullCache`] - no-op store for disabled caching

mod backend;
pub mod keys;
mod memory_cache;
mod null_cache;
mod pattern;
mod redis_cache;
mod service;

pub use backend::{CacheBackend, CacheError, CacheResult};
pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use pattern::KeyPattern;
pub use redis_cache::RedisCache;
pub use service::{CacheService, DEFAULT_TTL};
