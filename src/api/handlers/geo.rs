//! Handlers exposing the mapping service to clients.

use axum::{Json, extract::State};

use crate::api::dto::geo::{DistanceRequest, GeocodeRequest, GeocodeResponse, to_points};
use crate::api::extract::ValidatedJson;
use crate::error::AppError;
use crate::infrastructure::geocoding::DistanceMatrix;
use crate::state::AppState;

/// Resolves an address to coordinates.
///
/// # Endpoint
///
/// `POST /api/geo/geocode`
///
/// # Response
///
/// `{"result": null}` when the address is unknown, otherwise:
///
/// ```json
/// {
///   "result": {
///     "location": { "lat": 52.52, "lng": 13.405 },
///     "formatted_address": "Berlin, Germany",
///     "place_id": "ChIJ..."
///   }
/// }
/// ```
///
/// # Errors
///
/// - **502** if the mapping service fails
/// - **503** if no API key is configured
pub async fn geocode_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<GeocodeRequest>,
) -> Result<Json<GeocodeResponse>, AppError> {
    let result = state.geo_service.geocode(payload.address.trim()).await?;
    Ok(Json(GeocodeResponse { result }))
}

/// Distance matrix between coordinate lists (up to 25 each).
///
/// `POST /api/geo/distance`
pub async fn distance_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<DistanceRequest>,
) -> Result<Json<DistanceMatrix>, AppError> {
    let matrix = state
        .geo_service
        .distance_matrix(&to_points(&payload.origins), &to_points(&payload.destinations))
        .await?;

    Ok(Json(matrix))
}
