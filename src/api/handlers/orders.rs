//! Handlers for orders.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::order::{CreateOrderRequest, OrderListParams, OrderResponse, OrderSummary};
use crate::api::dto::pagination::ListResponse;
use crate::api::extract::{ValidatedJson, ValidatedQuery};
use crate::domain::entities::StaffIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// Places an order.
///
/// # Endpoint
///
/// `POST /api/orders`
///
/// # Request Body
///
/// ```json
/// {
///   "customer_id": 7,
///   "delivery_address": "Main St 5, Springfield",
///   "items": [
///     { "product_id": 1, "quantity": 2 },
///     { "product_id": 4, "quantity": 1 }
///   ]
/// }
/// ```
///
/// Stock is reserved and lines are priced in a single transaction. When the
/// pharmacy has coordinates and a mapping backend is configured, the distance
/// to `delivery_address` is stored with the order.
///
/// # Errors
///
/// - **400** for invalid items, or prescription-only products without a customer
/// - **404** for unknown customers or products
/// - **409** if a product does not have enough stock
pub async fn create_order_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let order = state.order_service.place(&caller, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// Lists orders, newest first.
///
/// `GET /api/orders?status=pending&page=1&page_size=25`
pub async fn order_list_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    ValidatedQuery(params): ValidatedQuery<OrderListParams>,
) -> Result<Json<ListResponse<OrderSummary>>, AppError> {
    let page = state
        .order_service
        .list(
            caller.pharmacy_id,
            params.status,
            params.pagination.page(),
            params.pagination.page_size(),
        )
        .await?;

    Ok(Json(ListResponse::from_page(page, OrderSummary::from)))
}

/// `GET /api/orders/{id}`
pub async fn order_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    Path(id): Path<i64>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.order_service.get(caller.pharmacy_id, id).await?;
    Ok(Json(order.into()))
}

/// Marks a pending order as completed.
///
/// `POST /api/orders/{id}/complete`
///
/// # Errors
///
/// Returns **409** if the order is not pending.
pub async fn complete_order_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    Path(id): Path<i64>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.order_service.complete(caller.pharmacy_id, id).await?;
    Ok(Json(order.into()))
}

/// Cancels a pending order and returns its items to stock.
///
/// `POST /api/orders/{id}/cancel`
///
/// # Errors
///
/// Returns **409** if the order is not pending.
pub async fn cancel_order_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    Path(id): Path<i64>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.order_service.cancel(caller.pharmacy_id, id).await?;
    Ok(Json(order.into()))
}
