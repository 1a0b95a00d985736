//! PostgreSQL implementation of the product repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use super::like_pattern;
use crate::domain::entities::{NewProduct, Product, ProductPatch};
use crate::domain::repositories::ProductRepository;
use crate::error::AppError;

const COLUMNS: &str = "id, pharmacy_id, sku, name, description, price_cents, stock, \
                       requires_prescription, created_at, updated_at";

const SEARCH: &str = "($2::text IS NULL OR name ILIKE $2 OR sku ILIKE $2)";

/// Catalog storage. Rows with `deleted_at` set are never returned.
pub struct PgProductRepository {
    pool: Arc<PgPool>,
}

impl PgProductRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, new_product: NewProduct) -> Result<Product, AppError> {
        let sql = format!(
            "INSERT INTO products (pharmacy_id, sku, name, description, price_cents, stock, requires_prescription)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(new_product.pharmacy_id)
            .bind(new_product.sku)
            .bind(new_product.name)
            .bind(new_product.description)
            .bind(new_product.price_cents)
            .bind(new_product.stock)
            .bind(new_product.requires_prescription)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(product)
    }

    async fn find_by_id(&self, pharmacy_id: i64, id: i64) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM products
             WHERE pharmacy_id = $1 AND id = $2 AND deleted_at IS NULL"
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(pharmacy_id)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(product)
    }

    async fn find_many(&self, pharmacy_id: i64, ids: Vec<i64>) -> Result<Vec<Product>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {COLUMNS} FROM products
             WHERE pharmacy_id = $1 AND id = ANY($2) AND deleted_at IS NULL
             ORDER BY id"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pharmacy_id)
            .bind(ids)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(products)
    }

    async fn list(
        &self,
        pharmacy_id: i64,
        query: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Product>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM products
             WHERE pharmacy_id = $1 AND deleted_at IS NULL AND {SEARCH}
             ORDER BY name, id
             LIMIT $3 OFFSET $4"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pharmacy_id)
            .bind(like_pattern(query))
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(products)
    }

    async fn count(&self, pharmacy_id: i64, query: Option<String>) -> Result<i64, AppError> {
        let sql = format!(
            "SELECT COUNT(*) FROM products
             WHERE pharmacy_id = $1 AND deleted_at IS NULL AND {SEARCH}"
        );

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(pharmacy_id)
            .bind(like_pattern(query))
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn update(
        &self,
        pharmacy_id: i64,
        id: i64,
        patch: ProductPatch,
    ) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "UPDATE products SET
                sku = COALESCE($3, sku),
                name = COALESCE($4, name),
                description = COALESCE($5, description),
                price_cents = COALESCE($6, price_cents),
                requires_prescription = COALESCE($7, requires_prescription),
                updated_at = NOW()
             WHERE pharmacy_id = $1 AND id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(pharmacy_id)
            .bind(id)
            .bind(patch.sku)
            .bind(patch.name)
            .bind(patch.description)
            .bind(patch.price_cents)
            .bind(patch.requires_prescription)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(product)
    }

    async fn soft_delete(&self, pharmacy_id: i64, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = NOW(), updated_at = NOW()
             WHERE pharmacy_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
        .bind(pharmacy_id)
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn adjust_stock(
        &self,
        pharmacy_id: i64,
        id: i64,
        delta: i32,
    ) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "UPDATE products SET stock = stock + $3, updated_at = NOW()
             WHERE pharmacy_id = $1 AND id = $2 AND deleted_at IS NULL AND stock + $3 >= 0
             RETURNING {COLUMNS}"
        );

        let updated = sqlx::query_as::<_, Product>(&sql)
            .bind(pharmacy_id)
            .bind(id)
            .bind(delta)
            .fetch_optional(self.pool.as_ref())
            .await?;

        if updated.is_some() {
            return Ok(updated);
        }

        // Either the product is gone or the delta would make stock negative.
        match self.find_by_id(pharmacy_id, id).await? {
            None => Ok(None),
            Some(product) => Err(AppError::conflict(
                "Insufficient stock",
                json!({ "product_id": id, "stock": product.stock, "delta": delta }),
            )),
        }
    }
}
