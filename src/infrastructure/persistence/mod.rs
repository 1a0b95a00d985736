//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx runtime
//! queries mapped through `FromRow`. Every tenant-scoped statement filters by
//! `pharmacy_id`.
//!
//! # Repositories
//!
//! - [`PgPharmacyRepository`] - pharmacies
//! - [`PgStaffRepository`] - staff accounts
//! - [`PgSessionRepository`] - bearer token sessions
//! - [`PgProductRepository`] - catalog and stock levels
//! - [`PgCustomerRepository`] - customers and health records
//! - [`PgOrderRepository`] - transactional order placement

pub mod pg_customer_repository;
pub mod pg_order_repository;
pub mod pg_pharmacy_repository;
pub mod pg_product_repository;
pub mod pg_session_repository;
pub mod pg_staff_repository;

pub use pg_customer_repository::PgCustomerRepository;
pub use pg_order_repository::PgOrderRepository;
pub use pg_pharmacy_repository::PgPharmacyRepository;
pub use pg_product_repository::PgProductRepository;
pub use pg_session_repository::PgSessionRepository;
pub use pg_staff_repository::PgStaffRepository;

/// Builds an `ILIKE` substring pattern, escaping the wildcard characters of
/// the user's input.
pub(crate) fn like_pattern(query: Option<String>) -> Option<String> {
    let query = query?;
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    let escaped = trimmed
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}
