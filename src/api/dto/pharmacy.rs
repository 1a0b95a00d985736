//! DTOs for the pharmacy profile.

use serde::Deserialize;
use validator::Validate;

use super::common::{PHONE_REGEX, PointDto, not_blank, valid_point};
use crate::domain::entities::PharmacyPatch;

/// Request body for `PATCH /api/pharmacy`.
///
/// # `location` semantics
///
/// - **Absent** → geocode a new `address`, otherwise unchanged
/// - **`null`** → clear stored coordinates
/// - **Point** → store these coordinates as given
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePharmacyRequest {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 500), custom(function = "not_blank"))]
    pub address: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(custom(function = "valid_point"))]
    pub location: Option<Option<PointDto>>,
}

impl From<UpdatePharmacyRequest> for PharmacyPatch {
    fn from(req: UpdatePharmacyRequest) -> Self {
        PharmacyPatch {
            name: req.name.map(|s| s.trim().to_string()),
            address: req.address.map(|s| s.trim().to_string()),
            phone: req.phone,
            coordinates: req.location.map(|point| point.map(|p| (p.lat, p.lng))),
        }
    }
}
