//! DTOs for orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use super::common::not_blank;
use super::pagination::PaginationParams;
use crate::application::services::PlaceOrder;
use crate::domain::entities::{NewOrderLine, Order, OrderItem, OrderStatus, OrderWithItems};

/// Request body for `POST /api/orders`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(range(min = 1))]
    pub customer_id: Option<i64>,

    #[validate(length(min = 1, max = 500), custom(function = "not_blank"))]
    pub delivery_address: Option<String>,

    #[validate(length(min = 1, max = 100, message = "An order needs 1-100 items"), nested)]
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct OrderLineRequest {
    #[validate(range(min = 1))]
    pub product_id: i64,

    #[validate(range(min = 1, max = 10_000))]
    pub quantity: i32,
}

impl From<CreateOrderRequest> for PlaceOrder {
    fn from(req: CreateOrderRequest) -> Self {
        PlaceOrder {
            customer_id: req.customer_id,
            delivery_address: req.delivery_address.map(|a| a.trim().to_string()),
            lines: req
                .items
                .into_iter()
                .map(|item| NewOrderLine {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// `GET /api/orders` query: pagination plus an optional status filter.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct OrderListParams {
    #[serde(flatten)]
    #[validate(nested)]
    pub pagination: PaginationParams,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Serialize)]
pub struct OrderLineItem {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl From<OrderItem> for OrderLineItem {
    fn from(item: OrderItem) -> Self {
        OrderLineItem {
            line_total_cents: item.line_total_cents(),
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
        }
    }
}

/// Order header as returned in listings.
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub staff_id: i64,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub delivery_address: Option<String>,
    pub delivery_distance_meters: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderSummary {
    fn from(o: Order) -> Self {
        OrderSummary {
            id: o.id,
            customer_id: o.customer_id,
            staff_id: o.staff_id,
            status: o.status,
            total_cents: o.total_cents,
            delivery_address: o.delivery_address,
            delivery_distance_meters: o.delivery_distance_meters,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

/// A full order with its lines.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: OrderSummary,
    pub items: Vec<OrderLineItem>,
}

impl From<OrderWithItems> for OrderResponse {
    fn from(o: OrderWithItems) -> Self {
        OrderResponse {
            order: o.order.into(),
            items: o.items.into_iter().map(Into::into).collect(),
        }
    }
}
