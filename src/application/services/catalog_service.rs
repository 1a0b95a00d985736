//! Product catalog with cache-aside reads.
//!
//! Single products and list pages are cached per pharmacy. Every write drops
//! all product keys of that pharmacy with one pattern delete, since a change
//! to one product can move it between list pages.

use serde_json::json;
use std::sync::Arc;

use super::page::{Page, offset_limit};
use crate::domain::entities::{NewProduct, Product, ProductPatch};
use crate::domain::repositories::ProductRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, keys};

pub struct CatalogService<P: ProductRepository> {
    repository: Arc<P>,
    cache: CacheService,
}

impl<P: ProductRepository> CatalogService<P> {
    pub fn new(repository: Arc<P>, cache: CacheService) -> Self {
        Self { repository, cache }
    }

    fn not_found(id: i64) -> AppError {
        AppError::not_found("Product not found", json!({ "id": id }))
    }

    async fn invalidate(&self, pharmacy_id: i64) {
        let removed = self
            .cache
            .delete_by_pattern(&keys::products_of(pharmacy_id))
            .await;
        tracing::debug!(pharmacy_id, removed, "product cache invalidated");
    }

    /// Lists products of a pharmacy, optionally filtered by name or SKU.
    pub async fn list(
        &self,
        pharmacy_id: i64,
        page: u32,
        page_size: u32,
        query: Option<String>,
    ) -> Result<Page<Product>, AppError> {
        let key = keys::product_list(pharmacy_id, page, page_size, query.as_deref());
        let repository = self.repository.clone();

        self.cache
            .get_or_compute(&key, None, || async move {
                let (offset, limit) = offset_limit(page, page_size);
                let items = repository
                    .list(pharmacy_id, query.clone(), offset, limit)
                    .await?;
                let total = repository.count(pharmacy_id, query).await?;

                Ok::<_, AppError>(Page {
                    items,
                    page,
                    page_size,
                    total,
                })
            })
            .await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the product does not exist or was deleted.
    pub async fn get(&self, pharmacy_id: i64, id: i64) -> Result<Product, AppError> {
        let repository = self.repository.clone();

        self.cache
            .get_or_compute(&keys::product(pharmacy_id, id), None, || async move {
                repository.find_by_id(pharmacy_id, id).await
            })
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the SKU is already used in this pharmacy.
    pub async fn create(&self, new_product: NewProduct) -> Result<Product, AppError> {
        let pharmacy_id = new_product.pharmacy_id;
        let product = self.repository.create(new_product).await?;
        self.invalidate(pharmacy_id).await;

        tracing::info!(pharmacy_id, product_id = product.id, sku = %product.sku, "product created");
        Ok(product)
    }

    pub async fn update(
        &self,
        pharmacy_id: i64,
        id: i64,
        patch: ProductPatch,
    ) -> Result<Product, AppError> {
        if patch.is_empty() {
            return Err(AppError::bad_request("No fields to update", json!({})));
        }

        let product = self
            .repository
            .update(pharmacy_id, id, patch)
            .await?
            .ok_or_else(|| Self::not_found(id))?;
        self.invalidate(pharmacy_id).await;

        Ok(product)
    }

    /// Soft-deletes a product. Past orders keep referencing it.
    pub async fn delete(&self, pharmacy_id: i64, id: i64) -> Result<(), AppError> {
        if !self.repository.soft_delete(pharmacy_id, id).await? {
            return Err(Self::not_found(id));
        }
        self.invalidate(pharmacy_id).await;

        tracing::info!(pharmacy_id, product_id = id, "product deleted");
        Ok(())
    }

    /// Receives (`delta > 0`) or writes off (`delta < 0`) stock.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `delta` is zero
    /// - [`AppError::NotFound`] if the product does not exist
    /// - [`AppError::Conflict`] if stock would become negative
    pub async fn adjust_stock(
        &self,
        pharmacy_id: i64,
        id: i64,
        delta: i32,
    ) -> Result<Product, AppError> {
        if delta == 0 {
            return Err(AppError::bad_request(
                "Stock adjustment must be non-zero",
                json!({ "delta": delta }),
            ));
        }

        let product = self
            .repository
            .adjust_stock(pharmacy_id, id, delta)
            .await?
            .ok_or_else(|| Self::not_found(id))?;
        self.invalidate(pharmacy_id).await;

        Ok(product)
    }
}
