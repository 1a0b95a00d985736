//! Repository trait for the product catalog.

use crate::domain::entities::{NewProduct, Product, ProductPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Catalog access. Soft-deleted products are invisible to every method.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Creates a product.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the SKU already exists in this pharmacy.
    async fn create(&self, new_product: NewProduct) -> Result<Product, AppError>;

    async fn find_by_id(&self, pharmacy_id: i64, id: i64) -> Result<Option<Product>, AppError>;

    /// Fetches several products at once; unknown ids are simply absent.
    async fn find_many(&self, pharmacy_id: i64, ids: Vec<i64>) -> Result<Vec<Product>, AppError>;

    /// Lists products ordered by name, optionally filtered by a
    /// case-insensitive substring of name or SKU.
    async fn list(
        &self,
        pharmacy_id: i64,
        query: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Product>, AppError>;

    async fn count(&self, pharmacy_id: i64, query: Option<String>) -> Result<i64, AppError>;

    /// Applies a partial update. Returns `None` if the product does not exist.
    async fn update(
        &self,
        pharmacy_id: i64,
        id: i64,
        patch: ProductPatch,
    ) -> Result<Option<Product>, AppError>;

    /// Soft-deletes a product. Returns `false` if not found or already deleted.
    async fn soft_delete(&self, pharmacy_id: i64, id: i64) -> Result<bool, AppError>;

    /// Adds `delta` (may be negative) to the stock level.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the stock would drop below zero.
    async fn adjust_stock(
        &self,
        pharmacy_id: i64,
        id: i64,
        delta: i32,
    ) -> Result<Option<Product>, AppError>;
}
