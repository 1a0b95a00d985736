//! Repository trait for orders.

use crate::domain::entities::{NewOrder, Order, OrderStatus, OrderWithItems};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Places an order atomically.
    ///
    /// Within one transaction: decrements stock for every line (failing if a
    /// product is missing or short), prices each line at the product's current
    /// price, and inserts the order with its computed total.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if a product does not exist in the pharmacy
    /// - [`AppError::Conflict`] if stock is insufficient
    async fn create(&self, new_order: NewOrder) -> Result<OrderWithItems, AppError>;

    async fn find_by_id(
        &self,
        pharmacy_id: i64,
        id: i64,
    ) -> Result<Option<OrderWithItems>, AppError>;

    /// Lists order headers, newest first.
    async fn list(
        &self,
        pharmacy_id: i64,
        status: Option<OrderStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Order>, AppError>;

    async fn count(&self, pharmacy_id: i64, status: Option<OrderStatus>) -> Result<i64, AppError>;

    /// Moves an order from `from` to `to`, restoring line stock when `restock`
    /// is set. Returns `None` if the order does not exist or is not in `from`.
    async fn transition(
        &self,
        pharmacy_id: i64,
        id: i64,
        from: OrderStatus,
        to: OrderStatus,
        restock: bool,
    ) -> Result<Option<Order>, AppError>;
}
