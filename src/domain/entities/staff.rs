//! Staff members and their authenticated identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a staff member is allowed to do inside their pharmacy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Admin,
    Pharmacist,
    Cashier,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Pharmacist => "pharmacist",
            Self::Cashier => "cashier",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "pharmacist" => Ok(Self::Pharmacist),
            "cashier" => Ok(Self::Cashier),
            other => Err(format!("unknown staff role '{other}'")),
        }
    }
}

impl TryFrom<String> for StaffRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A staff account as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Staff {
    pub id: i64,
    pub pharmacy_id: i64,
    pub email: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub role: StaffRole,
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Staff {
    pub fn identity(&self) -> StaffIdentity {
        StaffIdentity {
            staff_id: self.id,
            pharmacy_id: self.pharmacy_id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// Input data for creating a staff account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewStaff {
    pub pharmacy_id: i64,
    pub email: String,
    pub name: String,
    pub role: StaffRole,
    pub password_hash: String,
}

/// The authenticated caller, resolved from a bearer token.
///
/// Inserted into request extensions by the auth middleware; every
/// tenant-scoped query is filtered by `pharmacy_id`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct StaffIdentity {
    pub staff_id: i64,
    pub pharmacy_id: i64,
    pub email: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub role: StaffRole,
}

/// Input data for persisting a login session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub staff_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [StaffRole::Admin, StaffRole::Pharmacist, StaffRole::Cashier] {
            assert_eq!(role.as_str().parse::<StaffRole>().unwrap(), role);
        }
        assert!("owner".parse::<StaffRole>().is_err());
    }

    #[test]
    fn test_identity_copies_tenant_and_role() {
        let staff = Staff {
            id: 4,
            pharmacy_id: 2,
            email: "a@b.test".to_string(),
            name: "Ann".to_string(),
            role: StaffRole::Pharmacist,
            password_hash: "x".to_string(),
            active: true,
            created_at: Utc::now(),
        };

        let identity = staff.identity();
        assert_eq!(identity.staff_id, 4);
        assert_eq!(identity.pharmacy_id, 2);
        assert_eq!(identity.role, StaffRole::Pharmacist);
        assert!(!identity.role.is_admin());
    }
}
