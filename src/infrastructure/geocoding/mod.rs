//! Address geocoding and distance lookups against an external mapping service.
//!
//! Services depend on the [`Geocoder`] trait; [`GoogleMapsClient`] is the
//! production implementation.

mod google;
mod types;

pub use google::GoogleMapsClient;
pub use types::{DistanceElement, DistanceMatrix, GeoPoint, GeocodeResult};

use async_trait::async_trait;
use thiserror::Error;

/// Failures talking to the mapping service.
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Transport or HTTP status failure. The request URL is stripped, since
    /// its query string carries the API key.
    #[error("mapping service request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("mapping service returned status {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status {
        status: String,
        message: Option<String>,
    },

    #[error("invalid mapping service URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for GeocodingError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

/// Address-to-coordinate and distance lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves an address to its best match.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(result))` for the first match
    /// - `Ok(None)` when the service finds nothing
    ///
    /// # Errors
    ///
    /// Transport failures and error statuses are logged and returned.
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeResult>, GeocodingError>;

    /// Distances from every origin to every destination.
    ///
    /// # Errors
    ///
    /// Transport failures and error statuses are logged and returned.
    async fn distance_matrix(
        &self,
        origins: &[GeoPoint],
        destinations: &[GeoPoint],
    ) -> Result<DistanceMatrix, GeocodingError>;
}
