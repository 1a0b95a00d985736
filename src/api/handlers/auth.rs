//! Handlers for staff login and session endpoints.

use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_auth::AuthBearer;

use crate::api::dto::auth::{LoginRequest, LoginResponse};
use crate::api::extract::ValidatedJson;
use crate::domain::entities::StaffIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// Exchanges email and password for a bearer token.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// # Request Body
///
/// ```json
/// { "email": "admin@pharmacy.test", "password": "secret" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "Q2x...48 chars",
///   "token_type": "Bearer",
///   "expires_at": "2026-01-01T12:00:00Z",
///   "staff": { "staff_id": 1, "pharmacy_id": 1, "email": "...", "name": "...", "role": "admin" }
/// }
/// ```
///
/// # Errors
///
/// - **400** if the body is malformed
/// - **401** if the credentials are not accepted
pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = payload.email.trim().to_lowercase();
    let session = state.auth_service.login(&email, &payload.password).await?;

    Ok(Json(LoginResponse {
        token: session.token,
        token_type: "Bearer",
        expires_at: session.expires_at,
        staff: session.staff,
    }))
}

/// Returns the authenticated staff member.
///
/// `GET /api/auth/me`
pub async fn me_handler(Extension(caller): Extension<StaffIdentity>) -> Json<StaffIdentity> {
    Json(caller)
}

/// Revokes the token used for this request.
///
/// `POST /api/auth/logout` → **204 No Content**
pub async fn logout_handler(
    State(state): State<AppState>,
    AuthBearer(token): AuthBearer,
) -> Result<StatusCode, AppError> {
    state.auth_service.logout(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}
