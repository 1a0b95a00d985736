//! Order placement and lifecycle.
//!
//! Stock checks and pricing happen inside the repository transaction. This
//! service enforces the rules that need more context: products must exist in
//! the caller's pharmacy, prescription-only products need a customer, and the
//! delivery distance is looked up from the pharmacy's location.

use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

use super::geo_service::GeoService;
use super::page::{Page, offset_limit};
use crate::domain::entities::order::merge_lines;
use crate::domain::entities::{
    NewOrder, NewOrderLine, Order, OrderStatus, OrderWithItems, StaffIdentity,
};
use crate::domain::repositories::{
    CustomerRepository, OrderRepository, PharmacyRepository, ProductRepository,
};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, keys};

/// What a caller asks for when placing an order.
#[derive(Debug, Clone, Default)]
pub struct PlaceOrder {
    pub customer_id: Option<i64>,
    pub delivery_address: Option<String>,
    pub lines: Vec<NewOrderLine>,
}

pub struct OrderService<O, P, Ph, C>
where
    O: OrderRepository,
    P: ProductRepository,
    Ph: PharmacyRepository,
    C: CustomerRepository,
{
    orders: Arc<O>,
    products: Arc<P>,
    pharmacies: Arc<Ph>,
    customers: Arc<C>,
    cache: CacheService,
    geo: GeoService,
}

impl<O, P, Ph, C> OrderService<O, P, Ph, C>
where
    O: OrderRepository,
    P: ProductRepository,
    Ph: PharmacyRepository,
    C: CustomerRepository,
{
    pub fn new(
        orders: Arc<O>,
        products: Arc<P>,
        pharmacies: Arc<Ph>,
        customers: Arc<C>,
        cache: CacheService,
        geo: GeoService,
    ) -> Self {
        Self {
            orders,
            products,
            pharmacies,
            customers,
            cache,
            geo,
        }
    }

    fn not_found(id: i64) -> AppError {
        AppError::not_found("Order not found", json!({ "id": id }))
    }

    /// Places an order on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an empty order, or prescription-only
    ///   products without a customer
    /// - [`AppError::NotFound`] if the customer or a product is unknown
    /// - [`AppError::Conflict`] if stock is insufficient
    pub async fn place(
        &self,
        caller: &StaffIdentity,
        request: PlaceOrder,
    ) -> Result<OrderWithItems, AppError> {
        let pharmacy_id = caller.pharmacy_id;
        let lines = merge_lines(&request.lines);

        if lines.is_empty() {
            return Err(AppError::bad_request(
                "Order must contain at least one item",
                json!({ "field": "items" }),
            ));
        }

        if let Some(customer_id) = request.customer_id
            && self
                .customers
                .find_by_id(pharmacy_id, customer_id)
                .await?
                .is_none()
        {
            return Err(AppError::not_found(
                "Customer not found",
                json!({ "id": customer_id }),
            ));
        }

        let ids: Vec<i64> = lines.iter().map(|line| line.product_id).collect();
        let products = self.products.find_many(pharmacy_id, ids.clone()).await?;

        let found: HashSet<i64> = products.iter().map(|p| p.id).collect();
        let missing: Vec<i64> = ids.into_iter().filter(|id| !found.contains(id)).collect();
        if !missing.is_empty() {
            return Err(AppError::not_found(
                "Product not found",
                json!({ "product_ids": missing }),
            ));
        }

        if request.customer_id.is_none() {
            let prescription_only: Vec<i64> = products
                .iter()
                .filter(|p| p.requires_prescription)
                .map(|p| p.id)
                .collect();

            if !prescription_only.is_empty() {
                return Err(AppError::bad_request(
                    "Prescription-only products require a customer",
                    json!({ "product_ids": prescription_only }),
                ));
            }
        }

        let delivery_distance_meters = match request.delivery_address.as_deref() {
            Some(address) => self.delivery_distance(pharmacy_id, address).await?,
            None => None,
        };

        let placed = self
            .orders
            .create(NewOrder {
                pharmacy_id,
                customer_id: request.customer_id,
                staff_id: caller.staff_id,
                delivery_address: request.delivery_address,
                delivery_distance_meters,
                lines,
            })
            .await?;

        self.cache
            .delete_by_pattern(&keys::products_of(pharmacy_id))
            .await;

        metrics::counter!("orders_placed_total").increment(1);
        tracing::info!(
            pharmacy_id,
            order_id = placed.order.id,
            total_cents = placed.order.total_cents,
            items = placed.items.len(),
            "order placed"
        );

        Ok(placed)
    }

    async fn delivery_distance(
        &self,
        pharmacy_id: i64,
        address: &str,
    ) -> Result<Option<i64>, AppError> {
        if !self.geo.is_enabled() {
            return Ok(None);
        }

        let origin = self
            .pharmacies
            .find_by_id(pharmacy_id)
            .await?
            .and_then(|pharmacy| pharmacy.coordinates());

        Ok(match origin {
            Some(origin) => self.geo.distance_to_address(origin, address).await,
            None => None,
        })
    }

    pub async fn get(&self, pharmacy_id: i64, id: i64) -> Result<OrderWithItems, AppError> {
        let orders = self.orders.clone();

        self.cache
            .get_or_compute(&keys::order(pharmacy_id, id), None, || async move {
                orders.find_by_id(pharmacy_id, id).await
            })
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Lists order headers, newest first.
    pub async fn list(
        &self,
        pharmacy_id: i64,
        status: Option<OrderStatus>,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Order>, AppError> {
        let (offset, limit) = offset_limit(page, page_size);
        let items = self.orders.list(pharmacy_id, status, offset, limit).await?;
        let total = self.orders.count(pharmacy_id, status).await?;

        Ok(Page {
            items,
            page,
            page_size,
            total,
        })
    }

    pub async fn complete(&self, pharmacy_id: i64, id: i64) -> Result<OrderWithItems, AppError> {
        self.transition(pharmacy_id, id, OrderStatus::Completed).await
    }

    /// Cancels a pending order and puts its items back into stock.
    pub async fn cancel(&self, pharmacy_id: i64, id: i64) -> Result<OrderWithItems, AppError> {
        self.transition(pharmacy_id, id, OrderStatus::Cancelled).await
    }

    async fn transition(
        &self,
        pharmacy_id: i64,
        id: i64,
        to: OrderStatus,
    ) -> Result<OrderWithItems, AppError> {
        let current = self
            .orders
            .find_by_id(pharmacy_id, id)
            .await?
            .ok_or_else(|| Self::not_found(id))?;

        let from = current.order.status;
        let conflict = || {
            AppError::conflict(
                format!("Order cannot move from {from} to {to}"),
                json!({ "id": id, "status": from, "target": to }),
            )
        };

        if !from.can_transition_to(to) {
            return Err(conflict());
        }

        let restock = to == OrderStatus::Cancelled;
        let order = self
            .orders
            .transition(pharmacy_id, id, from, to, restock)
            .await?
            .ok_or_else(conflict)?;

        self.cache.delete(&keys::order(pharmacy_id, id)).await;
        if restock {
            self.cache
                .delete_by_pattern(&keys::products_of(pharmacy_id))
                .await;
        }

        tracing::info!(pharmacy_id, order_id = id, status = %to, "order status changed");

        Ok(OrderWithItems {
            order,
            items: current.items,
        })
    }
}
