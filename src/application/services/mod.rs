//! Business logic services for the application layer.

pub mod auth_service;
pub mod catalog_service;
pub mod customer_service;
pub mod geo_service;
pub mod order_service;
pub mod page;
pub mod pharmacy_service;
pub mod staff_service;

pub use auth_service::{AuthService, IssuedSession};
pub use catalog_service::CatalogService;
pub use customer_service::CustomerService;
pub use geo_service::GeoService;
pub use order_service::{OrderService, PlaceOrder};
pub use page::Page;
pub use pharmacy_service::PharmacyService;
pub use staff_service::{StaffRegistration, StaffService};
