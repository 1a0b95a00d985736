//! Handlers for the product catalog.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::pagination::{ListResponse, SearchParams};
use crate::api::dto::product::{
    CreateProductRequest, StockAdjustmentRequest, UpdateProductRequest,
};
use crate::api::extract::{ValidatedJson, ValidatedQuery};
use crate::domain::entities::{Product, StaffIdentity};
use crate::error::AppError;
use crate::state::AppState;

/// Lists products with optional search.
///
/// # Endpoint
///
/// `GET /api/products?q=ibu&page=1&page_size=25`
///
/// `q` matches name or SKU, case-insensitively. Deleted products are never
/// listed.
pub async fn product_list_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> Result<Json<ListResponse<Product>>, AppError> {
    let page = state
        .catalog_service
        .list(
            caller.pharmacy_id,
            params.pagination.page(),
            params.pagination.page_size(),
            params.query(),
        )
        .await?;

    Ok(Json(ListResponse::from_page(page, |p| p)))
}

/// `GET /api/products/{id}`
pub async fn product_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, AppError> {
    let product = state.catalog_service.get(caller.pharmacy_id, id).await?;
    Ok(Json(product))
}

/// Adds a product to the catalog.
///
/// # Endpoint
///
/// `POST /api/products`
///
/// # Request Body
///
/// ```json
/// {
///   "sku": "IBU-400",
///   "name": "Ibuprofen 400mg",
///   "price_cents": 499,
///   "stock": 120,
///   "requires_prescription": false
/// }
/// ```
///
/// # Errors
///
/// - **400** if validation fails
/// - **409** if the SKU already exists in this pharmacy
pub async fn create_product_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state
        .catalog_service
        .create(payload.into_new_product(caller.pharmacy_id))
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Partially updates a product. Stock is changed through the stock endpoint.
///
/// `PATCH /api/products/{id}`
pub async fn update_product_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .catalog_service
        .update(caller.pharmacy_id, id, payload.into())
        .await?;

    Ok(Json(product))
}

/// Soft-deletes a product.
///
/// `DELETE /api/products/{id}` → **204 No Content**
///
/// Existing orders keep their lines; the product disappears from listings
/// and cannot be ordered again.
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.catalog_service.delete(caller.pharmacy_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Receives or writes off stock.
///
/// # Endpoint
///
/// `POST /api/products/{id}/stock`
///
/// ```json
/// { "delta": -3, "reason": "expired" }
/// ```
///
/// # Errors
///
/// - **400** for a zero or out-of-range delta
/// - **404** if the product does not exist
/// - **409** if stock would become negative
pub async fn adjust_stock_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<StockAdjustmentRequest>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .catalog_service
        .adjust_stock(caller.pharmacy_id, id, payload.delta)
        .await?;

    tracing::info!(
        pharmacy_id = caller.pharmacy_id,
        product_id = id,
        delta = payload.delta,
        reason = payload.reason.as_deref().unwrap_or("-"),
        staff_id = caller.staff_id,
        "stock adjusted"
    );

    Ok(Json(product))
}
