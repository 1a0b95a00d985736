//! Customers and their health records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A pharmacy customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: i64,
    pub pharmacy_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a customer.
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub pharmacy_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Partial update for a customer. `None` fields are left unchanged.
///
/// `coordinates: Some(None)` clears the stored location.
#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub coordinates: Option<Option<(f64, f64)>>,
}

/// Category of a health record entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthRecordKind {
    Allergy,
    Condition,
    Medication,
    Note,
}

impl HealthRecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allergy => "allergy",
            Self::Condition => "condition",
            Self::Medication => "medication",
            Self::Note => "note",
        }
    }
}

impl FromStr for HealthRecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allergy" => Ok(Self::Allergy),
            "condition" => Ok(Self::Condition),
            "medication" => Ok(Self::Medication),
            "note" => Ok(Self::Note),
            other => Err(format!("unknown health record kind '{other}'")),
        }
    }
}

impl TryFrom<String> for HealthRecordKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One entry of a customer's health history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HealthRecord {
    pub id: i64,
    pub pharmacy_id: i64,
    pub customer_id: i64,
    #[sqlx(try_from = "String")]
    pub kind: HealthRecordKind,
    pub description: String,
    pub recorded_at: DateTime<Utc>,
}

/// Input data for appending a health record.
#[derive(Debug, Clone)]
pub struct NewHealthRecord {
    pub pharmacy_id: i64,
    pub customer_id: i64,
    pub kind: HealthRecordKind,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_record_kind_parsing() {
        assert_eq!(
            "allergy".parse::<HealthRecordKind>().unwrap(),
            HealthRecordKind::Allergy
        );
        assert_eq!(HealthRecordKind::Medication.as_str(), "medication");
        assert!(HealthRecordKind::try_from("diagnosis".to_string()).is_err());
    }

    #[test]
    fn test_health_record_kind_serde_is_lowercase() {
        let json = serde_json::to_string(&HealthRecordKind::Condition).unwrap();
        assert_eq!(json, "\"condition\"");
    }
}
