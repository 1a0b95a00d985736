//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! caching, geocoding and business rules. Services are generic over repository
//! traits so they can be unit tested with mocks.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Staff login and bearer token authentication
//! - [`services::pharmacy_service::PharmacyService`] - Pharmacy profile
//! - [`services::staff_service::StaffService`] - Staff accounts (admin only)
//! - [`services::catalog_service::CatalogService`] - Products and stock, cache-aside
//! - [`services::customer_service::CustomerService`] - Customers and health records
//! - [`services::order_service::OrderService`] - Order placement and lifecycle
//! - [`services::geo_service::GeoService`] - Geocoding and distance lookups

pub mod services;
