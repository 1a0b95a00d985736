//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence, caching and the mapping
//! service.
//!
//! # Modules
//!
//! - [`cache`] - Cache-aside accessor over Redis, in-memory and no-op stores
//! - [`geocoding`] - Google Maps geocoding and distance matrix client
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod geocoding;
pub mod persistence;
