//! Repository trait for staff accounts.

use crate::domain::entities::{NewStaff, Staff};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Creates a staff account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    async fn create(&self, new_staff: NewStaff) -> Result<Staff, AppError>;

    /// Looks up an account by email (case-insensitive), across all pharmacies.
    async fn find_by_email(&self, email: &str) -> Result<Option<Staff>, AppError>;

    async fn list(&self, pharmacy_id: i64) -> Result<Vec<Staff>, AppError>;
}
