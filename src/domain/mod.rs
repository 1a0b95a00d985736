//! Domain layer: business entities and repository interfaces.
//!
//! - [`entities`] - core data structures
//! - [`repositories`] - data access traits, implemented in
//!   [`crate::infrastructure::persistence`]
//!
//! The domain layer has no dependency on infrastructure or presentation code.
//! Business rules live in [`crate::application::services`].

pub mod entities;
pub mod repositories;
