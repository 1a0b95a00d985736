//! PostgreSQL implementation of the order repository.
//!
//! Order placement runs in a single transaction: product rows are locked in
//! ascending id order (`SELECT ... FOR UPDATE`), stock is checked and
//! decremented, and the order is priced from the locked rows.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::order::{merge_lines, total_cents};
use crate::domain::entities::{NewOrder, Order, OrderItem, OrderStatus, OrderWithItems};
use crate::domain::repositories::OrderRepository;
use crate::error::AppError;

const COLUMNS: &str = "id, pharmacy_id, customer_id, staff_id, status, total_cents, \
                       delivery_address, delivery_distance_meters, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct LockedProduct {
    name: String,
    price_cents: i64,
    stock: i32,
}

pub struct PgOrderRepository {
    pool: Arc<PgPool>,
}

impl PgOrderRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, new_order: NewOrder) -> Result<OrderWithItems, AppError> {
        let lines = merge_lines(&new_order.lines);
        let mut tx = self.pool.begin().await?;

        let mut priced = Vec::with_capacity(lines.len());
        for line in &lines {
            let product = sqlx::query_as::<_, LockedProduct>(
                "SELECT name, price_cents, stock FROM products
                 WHERE pharmacy_id = $1 AND id = $2 AND deleted_at IS NULL
                 FOR UPDATE",
            )
            .bind(new_order.pharmacy_id)
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Product not found", json!({ "product_id": line.product_id }))
            })?;

            if product.stock < line.quantity {
                return Err(AppError::conflict(
                    "Insufficient stock",
                    json!({
                        "product_id": line.product_id,
                        "requested": line.quantity,
                        "available": product.stock,
                    }),
                ));
            }

            sqlx::query("UPDATE products SET stock = stock - $1, updated_at = NOW() WHERE id = $2")
                .bind(line.quantity)
                .bind(line.product_id)
                .execute(&mut *tx)
                .await?;

            priced.push((*line, product));
        }

        let total = total_cents(
            priced
                .iter()
                .map(|(line, product)| (line.quantity, product.price_cents)),
        );

        let sql = format!(
            "INSERT INTO orders (pharmacy_id, customer_id, staff_id, total_cents, delivery_address, delivery_distance_meters)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(new_order.pharmacy_id)
            .bind(new_order.customer_id)
            .bind(new_order.staff_id)
            .bind(total)
            .bind(new_order.delivery_address)
            .bind(new_order.delivery_distance_meters)
            .fetch_one(&mut *tx)
            .await?;

        let mut items = Vec::with_capacity(priced.len());
        for (line, product) in priced {
            let item_id = sqlx::query_scalar::<_, i64>(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price_cents)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(product.price_cents)
            .fetch_one(&mut *tx)
            .await?;

            items.push(OrderItem {
                id: item_id,
                order_id: order.id,
                product_id: line.product_id,
                product_name: product.name,
                quantity: line.quantity,
                unit_price_cents: product.price_cents,
            });
        }

        tx.commit().await?;

        Ok(OrderWithItems { order, items })
    }

    async fn find_by_id(
        &self,
        pharmacy_id: i64,
        id: i64,
    ) -> Result<Option<OrderWithItems>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM orders WHERE pharmacy_id = $1 AND id = $2");

        let Some(order) = sqlx::query_as::<_, Order>(&sql)
            .bind(pharmacy_id)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name,
                    oi.quantity, oi.unit_price_cents
             FROM order_items oi
             JOIN products p ON p.id = oi.product_id
             WHERE oi.order_id = $1
             ORDER BY oi.id",
        )
        .bind(order.id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(Some(OrderWithItems { order, items }))
    }

    async fn list(
        &self,
        pharmacy_id: i64,
        status: Option<OrderStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Order>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE pharmacy_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(pharmacy_id)
            .bind(status.map(|s| s.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(orders)
    }

    async fn count(&self, pharmacy_id: i64, status: Option<OrderStatus>) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE pharmacy_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(pharmacy_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn transition(
        &self,
        pharmacy_id: i64,
        id: i64,
        from: OrderStatus,
        to: OrderStatus,
        restock: bool,
    ) -> Result<Option<Order>, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE orders SET status = $4, updated_at = NOW()
             WHERE pharmacy_id = $1 AND id = $2 AND status = $3
             RETURNING {COLUMNS}"
        );
        let Some(order) = sqlx::query_as::<_, Order>(&sql)
            .bind(pharmacy_id)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if restock {
            sqlx::query(
                "UPDATE products p SET stock = p.stock + oi.quantity, updated_at = NOW()
                 FROM order_items oi
                 WHERE oi.order_id = $1 AND p.id = oi.product_id",
            )
            .bind(order.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Some(order))
    }
}
