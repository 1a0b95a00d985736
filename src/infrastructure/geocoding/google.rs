//! Google Maps Platform client (Geocoding + Distance Matrix APIs).

use super::types::{DistanceElement, DistanceMatrix, GeoPoint, GeocodeResult};
use super::{Geocoder, GeocodingError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Stateless call-through client; no caching, batching or retries.
pub struct GoogleMapsClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<RawGeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGeocodeResult {
    formatted_address: String,
    geometry: RawGeometry,
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: GeoPoint,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    origin_addresses: Vec<String>,
    #[serde(default)]
    destination_addresses: Vec<String>,
    #[serde(default)]
    rows: Vec<RawRow>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    elements: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    status: String,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: u64,
}

impl From<RawElement> for DistanceElement {
    fn from(raw: RawElement) -> Self {
        Self {
            status: raw.status,
            distance_meters: raw.distance.as_ref().map(|d| d.value),
            duration_seconds: raw.duration.as_ref().map(|d| d.value),
            distance_text: raw.distance.map(|d| d.text),
            duration_text: raw.duration.map(|d| d.text),
        }
    }
}

impl GoogleMapsClient {
    /// Builds a client against `base_url` (e.g. `https://maps.googleapis.com/maps/api`).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodingError::InvalidBaseUrl`] for an unparsable URL and
    /// [`GeocodingError::Http`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeocodingError> {
        // Url::join drops the last path segment unless the base ends with '/'
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)?;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pharmacy-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, GeocodingError> {
        Ok(self.base_url.join(path)?)
    }

    async fn fetch_geocode(&self, address: &str) -> Result<Option<GeocodeResult>, GeocodingError> {
        let response: GeocodeResponse = self
            .http
            .get(self.endpoint("geocode/json")?)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match response.status.as_str() {
            "OK" => Ok(response.results.into_iter().next().map(|r| GeocodeResult {
                location: r.geometry.location,
                formatted_address: r.formatted_address,
                place_id: r.place_id,
            })),
            "ZERO_RESULTS" => Ok(None),
            _ => Err(GeocodingError::Status {
                status: response.status,
                message: response.error_message,
            }),
        }
    }

    async fn fetch_distance_matrix(
        &self,
        origins: &[GeoPoint],
        destinations: &[GeoPoint],
    ) -> Result<DistanceMatrix, GeocodingError> {
        let origins = join_points(origins);
        let destinations = join_points(destinations);

        let response: DistanceMatrixResponse = self
            .http
            .get(self.endpoint("distancematrix/json")?)
            .query(&[
                ("origins", origins.as_str()),
                ("destinations", destinations.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "OK" {
            return Err(GeocodingError::Status {
                status: response.status,
                message: response.error_message,
            });
        }

        Ok(DistanceMatrix {
            origin_addresses: response.origin_addresses,
            destination_addresses: response.destination_addresses,
            rows: response
                .rows
                .into_iter()
                .map(|row| row.elements.into_iter().map(Into::into).collect())
                .collect(),
        })
    }
}

fn join_points(points: &[GeoPoint]) -> String {
    points
        .iter()
        .map(GeoPoint::to_param)
        .collect::<Vec<_>>()
        .join("|")
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeResult>, GeocodingError> {
        debug!(address, "geocoding address");
        self.fetch_geocode(address).await.inspect_err(|e| {
            error!(address, error = %e, "geocoding request failed");
        })
    }

    async fn distance_matrix(
        &self,
        origins: &[GeoPoint],
        destinations: &[GeoPoint],
    ) -> Result<DistanceMatrix, GeocodingError> {
        if origins.is_empty() || destinations.is_empty() {
            return Ok(DistanceMatrix::default());
        }

        debug!(
            origins = origins.len(),
            destinations = destinations.len(),
            "requesting distance matrix"
        );
        self.fetch_distance_matrix(origins, destinations)
            .await
            .inspect_err(|e| {
                error!(error = %e, "distance matrix request failed");
            })
    }
}
