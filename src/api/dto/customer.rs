//! DTOs for customers and health records.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use super::common::{PHONE_REGEX, PointDto, not_blank, valid_point};
use crate::domain::entities::{CustomerPatch, HealthRecordKind, NewCustomer};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,

    /// `YYYY-MM-DD`.
    pub date_of_birth: Option<NaiveDate>,

    #[validate(length(min = 1, max = 500), custom(function = "not_blank"))]
    pub address: Option<String>,

    #[validate(nested)]
    pub location: Option<PointDto>,
}

impl CreateCustomerRequest {
    pub fn into_new_customer(self, pharmacy_id: i64) -> NewCustomer {
        NewCustomer {
            pharmacy_id,
            name: self.name.trim().to_string(),
            email: self.email.map(|e| e.to_lowercase()),
            phone: self.phone,
            date_of_birth: self.date_of_birth,
            address: self.address.map(|a| a.trim().to_string()),
            latitude: self.location.map(|p| p.lat),
            longitude: self.location.map(|p| p.lng),
        }
    }
}

/// Request body for `PATCH /api/customers/{id}`. `location` follows the same
/// absent / `null` / point rules as the pharmacy profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,

    pub date_of_birth: Option<NaiveDate>,

    #[validate(length(min = 1, max = 500), custom(function = "not_blank"))]
    pub address: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(custom(function = "valid_point"))]
    pub location: Option<Option<PointDto>>,
}

impl From<UpdateCustomerRequest> for CustomerPatch {
    fn from(req: UpdateCustomerRequest) -> Self {
        CustomerPatch {
            name: req.name.map(|s| s.trim().to_string()),
            email: req.email.map(|e| e.to_lowercase()),
            phone: req.phone,
            date_of_birth: req.date_of_birth,
            address: req.address.map(|a| a.trim().to_string()),
            coordinates: req.location.map(|point| point.map(|p| (p.lat, p.lng))),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateHealthRecordRequest {
    pub kind: HealthRecordKind,

    #[validate(length(min = 1, max = 2000), custom(function = "not_blank"))]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_customer_normalizes() {
        let req: CreateCustomerRequest = serde_json::from_str(
            r#"{"name": " Jo Doe ", "email": "Jo@Example.COM", "date_of_birth": "1980-02-29"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());

        let new = req.into_new_customer(4);
        assert_eq!(new.name, "Jo Doe");
        assert_eq!(new.email.as_deref(), Some("jo@example.com"));
        assert_eq!(new.date_of_birth, NaiveDate::from_ymd_opt(1980, 2, 29));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let json = r#"{"name": "Jo", "date_of_birth": "1981-02-29"}"#;
        assert!(serde_json::from_str::<CreateCustomerRequest>(json).is_err());
    }

    #[test]
    fn test_nested_location_is_validated() {
        let req: CreateCustomerRequest =
            serde_json::from_str(r#"{"name": "Jo", "location": {"lat": 0, "lng": 200}}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_health_record_kind_is_checked() {
        let json = r#"{"kind": "diagnosis", "description": "x"}"#;
        assert!(serde_json::from_str::<CreateHealthRecordRequest>(json).is_err());

        let req: CreateHealthRecordRequest =
            serde_json::from_str(r#"{"kind": "allergy", "description": "  "}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
