//! Repository trait for customers and their health records.

use crate::domain::entities::{Customer, CustomerPatch, HealthRecord, NewCustomer, NewHealthRecord};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, AppError>;

    async fn find_by_id(&self, pharmacy_id: i64, id: i64) -> Result<Option<Customer>, AppError>;

    /// Lists customers ordered by name, optionally filtered by a
    /// case-insensitive substring of name, email or phone.
    async fn list(
        &self,
        pharmacy_id: i64,
        query: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Customer>, AppError>;

    async fn count(&self, pharmacy_id: i64, query: Option<String>) -> Result<i64, AppError>;

    /// Applies a partial update. Returns `None` if the customer does not exist.
    async fn update(
        &self,
        pharmacy_id: i64,
        id: i64,
        patch: CustomerPatch,
    ) -> Result<Option<Customer>, AppError>;

    async fn add_health_record(&self, record: NewHealthRecord) -> Result<HealthRecord, AppError>;

    /// Health history of a customer, newest first.
    async fn list_health_records(
        &self,
        pharmacy_id: i64,
        customer_id: i64,
    ) -> Result<Vec<HealthRecord>, AppError>;
}
