//! Value types returned by the mapping service.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `lat,lng` as the mapping API expects it in query strings.
    pub fn to_param(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// Best match for an address lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub location: GeoPoint,
    pub formatted_address: String,
    pub place_id: Option<String>,
}

/// One origin/destination cell of a distance matrix.
///
/// `status` is the per-element status reported by the service (`OK`,
/// `NOT_FOUND`, `ZERO_RESULTS`); distance and duration are only present for `OK`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceElement {
    pub status: String,
    pub distance_meters: Option<u64>,
    pub duration_seconds: Option<u64>,
    pub distance_text: Option<String>,
    pub duration_text: Option<String>,
}

impl DistanceElement {
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

/// Distances from every origin (rows) to every destination (columns).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    pub origin_addresses: Vec<String>,
    pub destination_addresses: Vec<String>,
    pub rows: Vec<Vec<DistanceElement>>,
}

impl DistanceMatrix {
    pub fn element(&self, origin: usize, destination: usize) -> Option<&DistanceElement> {
        self.rows.get(origin).and_then(|row| row.get(destination))
    }
}
