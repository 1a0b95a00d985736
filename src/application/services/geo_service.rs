//! Geocoding facade used by handlers and for address enrichment.
//!
//! The mapping service is optional. Direct lookups fail with `503` when it is
//! not configured; enrichment lookups are best-effort and never fail the
//! surrounding write.

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::infrastructure::geocoding::{DistanceMatrix, GeoPoint, GeocodeResult, Geocoder};

#[derive(Clone, Default)]
pub struct GeoService {
    geocoder: Option<Arc<dyn Geocoder>>,
}

impl GeoService {
    pub fn new(geocoder: Option<Arc<dyn Geocoder>>) -> Self {
        Self { geocoder }
    }

    /// A service with no mapping backend.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.geocoder.is_some()
    }

    fn require(&self) -> Result<&dyn Geocoder, AppError> {
        self.geocoder.as_deref().ok_or_else(|| {
            AppError::unavailable(
                "Geocoding is not configured",
                json!({ "reason": "GOOGLE_MAPS_API_KEY is not set" }),
            )
        })
    }

    /// Geocodes an address. `Ok(None)` when the service finds no match.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unavailable`] if no geocoder is configured
    /// - [`AppError::Upstream`] if the mapping service call fails
    pub async fn geocode(&self, address: &str) -> Result<Option<GeocodeResult>, AppError> {
        let result = self.require()?.geocode(address).await?;
        Ok(result)
    }

    /// Distance matrix between coordinate lists.
    ///
    /// # Errors
    ///
    /// Same as [`Self::geocode`].
    pub async fn distance_matrix(
        &self,
        origins: &[GeoPoint],
        destinations: &[GeoPoint],
    ) -> Result<DistanceMatrix, AppError> {
        let matrix = self
            .require()?
            .distance_matrix(origins, destinations)
            .await?;
        Ok(matrix)
    }

    /// Best-effort coordinates for an address.
    pub async fn locate(&self, address: &str) -> Option<(f64, f64)> {
        let geocoder = self.geocoder.as_deref()?;

        match geocoder.geocode(address).await {
            Ok(Some(result)) => Some((result.location.lat, result.location.lng)),
            Ok(None) => {
                debug!(address, "address not found by geocoder");
                None
            }
            Err(e) => {
                warn!(address, error = %e, "address enrichment failed");
                None
            }
        }
    }

    /// Best-effort road distance in meters from `origin` to an address.
    pub async fn distance_to_address(&self, origin: (f64, f64), address: &str) -> Option<i64> {
        let geocoder = self.geocoder.as_deref()?;
        let (lat, lng) = self.locate(address).await?;

        let origins = [GeoPoint::new(origin.0, origin.1)];
        let destinations = [GeoPoint::new(lat, lng)];

        match geocoder.distance_matrix(&origins, &destinations).await {
            Ok(matrix) => matrix
                .element(0, 0)
                .filter(|element| element.is_ok())
                .and_then(|element| element.distance_meters)
                .and_then(|meters| i64::try_from(meters).ok()),
            Err(e) => {
                warn!(address, error = %e, "delivery distance lookup failed");
                None
            }
        }
    }
}
