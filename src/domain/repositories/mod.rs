//! Repository trait definitions for the domain layer.
//!
//! Traits define the data access contract; PostgreSQL implementations live in
//! [`crate::infrastructure::persistence`]. Mocks are generated with `mockall`
//! for service unit tests.
//!
//! Every tenant-scoped method takes the caller's `pharmacy_id` and must never
//! return or touch rows of another pharmacy.
//!
//! # Available Repositories
//!
//! - [`PharmacyRepository`] - tenants
//! - [`StaffRepository`] - staff accounts
//! - [`SessionRepository`] - bearer token sessions
//! - [`ProductRepository`] - catalog and stock
//! - [`CustomerRepository`] - customers and health records
//! - [`OrderRepository`] - orders and their lines

pub mod customer_repository;
pub mod order_repository;
pub mod pharmacy_repository;
pub mod product_repository;
pub mod session_repository;
pub mod staff_repository;

pub use customer_repository::CustomerRepository;
pub use order_repository::OrderRepository;
pub use pharmacy_repository::PharmacyRepository;
pub use product_repository::ProductRepository;
pub use session_repository::SessionRepository;
pub use staff_repository::StaffRepository;

#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
#[cfg(test)]
pub use pharmacy_repository::MockPharmacyRepository;
#[cfg(test)]
pub use product_repository::MockProductRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use staff_repository::MockStaffRepository;
