//! Handlers for customers and their health records.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::customer::{
    CreateCustomerRequest, CreateHealthRecordRequest, UpdateCustomerRequest,
};
use crate::api::dto::pagination::{ListResponse, SearchParams};
use crate::api::extract::{ValidatedJson, ValidatedQuery};
use crate::domain::entities::{Customer, HealthRecord, StaffIdentity};
use crate::error::AppError;
use crate::state::AppState;

/// Lists customers with optional search over name, email and phone.
///
/// `GET /api/customers?q=doe&page=1&page_size=25`
pub async fn customer_list_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> Result<Json<ListResponse<Customer>>, AppError> {
    let page = state
        .customer_service
        .list(
            caller.pharmacy_id,
            params.pagination.page(),
            params.pagination.page_size(),
            params.query(),
        )
        .await?;

    Ok(Json(ListResponse::from_page(page, |c| c)))
}

/// `GET /api/customers/{id}`
pub async fn customer_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, AppError> {
    let customer = state.customer_service.get(caller.pharmacy_id, id).await?;
    Ok(Json(customer))
}

/// Registers a customer.
///
/// # Endpoint
///
/// `POST /api/customers`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Jo Doe",
///   "email": "jo@example.com",
///   "phone": "+49 30 1234567",
///   "date_of_birth": "1980-04-12",
///   "address": "Main St 5, Springfield"
/// }
/// ```
///
/// The address is geocoded when no `location` is given and a mapping backend
/// is configured. Geocoding failures never fail the request.
pub async fn create_customer_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    ValidatedJson(payload): ValidatedJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let customer = state
        .customer_service
        .create(payload.into_new_customer(caller.pharmacy_id))
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// `PATCH /api/customers/{id}`
pub async fn update_customer_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateCustomerRequest>,
) -> Result<Json<Customer>, AppError> {
    let customer = state
        .customer_service
        .update(caller.pharmacy_id, id, payload.into())
        .await?;

    Ok(Json(customer))
}

/// Health history of a customer, newest first.
///
/// `GET /api/customers/{id}/health-records`
pub async fn health_record_list_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<HealthRecord>>, AppError> {
    let records = state
        .customer_service
        .health_records(caller.pharmacy_id, id)
        .await?;

    Ok(Json(records))
}

/// Appends a health record (allergy, condition, medication or note).
///
/// # Endpoint
///
/// `POST /api/customers/{id}/health-records`
///
/// ```json
/// { "kind": "allergy", "description": "Penicillin" }
/// ```
pub async fn create_health_record_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CreateHealthRecordRequest>,
) -> Result<(StatusCode, Json<HealthRecord>), AppError> {
    let record = state
        .customer_service
        .add_health_record(
            caller.pharmacy_id,
            id,
            payload.kind,
            payload.description.trim().to_string(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}
