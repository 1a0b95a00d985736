//! Handlers for the caller's pharmacy profile.

use axum::{Extension, Json, extract::State};
use serde_json::json;

use crate::api::dto::pharmacy::UpdatePharmacyRequest;
use crate::api::extract::ValidatedJson;
use crate::domain::entities::{Pharmacy, StaffIdentity};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/pharmacy`
pub async fn pharmacy_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
) -> Result<Json<Pharmacy>, AppError> {
    let pharmacy = state.pharmacy_service.get(caller.pharmacy_id).await?;
    Ok(Json(pharmacy))
}

/// Partially updates the pharmacy profile.
///
/// # Endpoint
///
/// `PATCH /api/pharmacy` (admin only)
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Central Pharmacy",
///   "address": "Main St 1, Springfield",
///   "location": null
/// }
/// ```
///
/// A new `address` without `location` is geocoded when a mapping backend is
/// configured.
///
/// # Errors
///
/// - **400** for invalid fields or an empty body
/// - **403** unless the caller is an admin
pub async fn update_pharmacy_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<StaffIdentity>,
    ValidatedJson(payload): ValidatedJson<UpdatePharmacyRequest>,
) -> Result<Json<Pharmacy>, AppError> {
    if !caller.role.is_admin() {
        return Err(AppError::forbidden(
            "Admin role required",
            json!({ "role": caller.role.as_str() }),
        ));
    }

    let pharmacy = state
        .pharmacy_service
        .update(caller.pharmacy_id, payload.into())
        .await?;

    Ok(Json(pharmacy))
}
