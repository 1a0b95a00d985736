//! Repository trait for pharmacies.

use crate::domain::entities::{NewPharmacy, Pharmacy, PharmacyPatch};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PharmacyRepository: Send + Sync {
    /// Creates a pharmacy.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name is taken.
    async fn create(&self, new_pharmacy: NewPharmacy) -> Result<Pharmacy, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Pharmacy>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Pharmacy>, AppError>;

    /// Applies a partial update. Returns `None` if the pharmacy does not exist.
    async fn update(&self, id: i64, patch: PharmacyPatch) -> Result<Option<Pharmacy>, AppError>;
}
