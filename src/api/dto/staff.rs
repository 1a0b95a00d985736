//! DTOs for staff management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::not_blank;
use crate::application::services::StaffRegistration;
use crate::domain::entities::{Staff, StaffRole};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStaffRequest {
    #[validate(email(message = "Invalid email address"), length(max = 254))]
    pub email: String,

    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: String,

    pub role: StaffRole,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

impl From<CreateStaffRequest> for StaffRegistration {
    fn from(req: CreateStaffRequest) -> Self {
        StaffRegistration {
            email: req.email,
            name: req.name.trim().to_string(),
            role: req.role,
            password: req.password,
        }
    }
}

/// A staff account as returned by the API. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct StaffItem {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: StaffRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Staff> for StaffItem {
    fn from(s: Staff) -> Self {
        StaffItem {
            id: s.id,
            email: s.email,
            name: s.name,
            role: s.role,
            active: s.active,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StaffListResponse {
    pub items: Vec<StaffItem>,
}
