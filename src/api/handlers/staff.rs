//! Handlers for staff account management (admin only).

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::api::dto::staff::{CreateStaffRequest, StaffItem, StaffListResponse};
use crate::api::extract::ValidatedJson;
use crate::domain::entities::StaffIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// Lists staff accounts of the caller's pharmacy.
///
/// `GET /api/staff`
///
/// # Errors
///
/// Returns **403** unless the caller is an admin.
pub async fn staff_list_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
) -> Result<Json<StaffListResponse>, AppError> {
    let staff = state.staff_service.list(&caller).await?;

    Ok(Json(StaffListResponse {
        items: staff.into_iter().map(StaffItem::from).collect(),
    }))
}

/// Creates a staff account in the caller's pharmacy.
///
/// # Endpoint
///
/// `POST /api/staff`
///
/// # Request Body
///
/// ```json
/// {
///   "email": "cashier@pharmacy.test",
///   "name": "Sam Cashier",
///   "role": "cashier",
///   "password": "at-least-8-chars"
/// }
/// ```
///
/// # Errors
///
/// - **400** if validation fails
/// - **403** unless the caller is an admin
/// - **409** if the email is already registered
pub async fn create_staff_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    ValidatedJson(payload): ValidatedJson<CreateStaffRequest>,
) -> Result<(StatusCode, Json<StaffItem>), AppError> {
    let staff = state.staff_service.create(&caller, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(staff.into())))
}
