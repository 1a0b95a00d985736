//! DTOs for geocoding endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::{PointDto, not_blank};
use crate::infrastructure::geocoding::{GeoPoint, GeocodeResult};

#[derive(Debug, Deserialize, Validate)]
pub struct GeocodeRequest {
    #[validate(length(min = 1, max = 500), custom(function = "not_blank"))]
    pub address: String,
}

/// `result` is `null` when the address could not be found.
#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub result: Option<GeocodeResult>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DistanceRequest {
    #[validate(length(min = 1, max = 25), nested)]
    pub origins: Vec<PointDto>,

    #[validate(length(min = 1, max = 25), nested)]
    pub destinations: Vec<PointDto>,
}

pub fn to_points(points: &[PointDto]) -> Vec<GeoPoint> {
    points.iter().map(|p| GeoPoint::new(p.lat, p.lng)).collect()
}
