//! Pharmacy entity: the tenant every other record belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pharmacy (tenant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Pharmacy {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pharmacy {
    /// Coordinates, when both halves are known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Input data for creating a pharmacy.
#[derive(Debug, Clone, Default)]
pub struct NewPharmacy {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Partial update for a pharmacy. `None` fields are left unchanged.
///
/// `coordinates: Some(None)` clears the stored location.
#[derive(Debug, Clone, Default)]
pub struct PharmacyPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub coordinates: Option<Option<(f64, f64)>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_require_both_halves() {
        let mut pharmacy = Pharmacy {
            id: 1,
            name: "Central".to_string(),
            address: None,
            phone: None,
            latitude: Some(52.5),
            longitude: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(pharmacy.coordinates().is_none());

        pharmacy.longitude = Some(13.4);
        assert_eq!(pharmacy.coordinates(), Some((52.5, 13.4)));
    }
}
