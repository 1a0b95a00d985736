//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod auth;
pub mod common;
pub mod customer;
pub mod geo;
pub mod health;
pub mod order;
pub mod pagination;
pub mod pharmacy;
pub mod product;
pub mod staff;
