//! Staff account management.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{NewStaff, Staff, StaffIdentity, StaffRole};
use crate::domain::repositories::StaffRepository;
use crate::error::AppError;
use crate::utils::password::hash_password;

/// Plain-text input for a new account.
#[derive(Debug, Clone)]
pub struct StaffRegistration {
    pub email: String,
    pub name: String,
    pub role: StaffRole,
    pub password: String,
}

pub struct StaffService<S: StaffRepository> {
    repository: Arc<S>,
    signing_secret: String,
}

impl<S: StaffRepository> StaffService<S> {
    pub fn new(repository: Arc<S>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    fn require_admin(caller: &StaffIdentity) -> Result<(), AppError> {
        if caller.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Admin role required",
                json!({ "role": caller.role.as_str() }),
            ))
        }
    }

    /// Creates an account in the caller's pharmacy.
    ///
    /// # Errors
    ///
    /// - [`AppError::Forbidden`] unless the caller is an admin
    /// - [`AppError::Conflict`] if the email is taken
    pub async fn create(
        &self,
        caller: &StaffIdentity,
        registration: StaffRegistration,
    ) -> Result<Staff, AppError> {
        Self::require_admin(caller)?;
        self.register(caller.pharmacy_id, registration).await
    }

    /// Creates an account without an authenticated caller (used for seeding).
    pub async fn register(
        &self,
        pharmacy_id: i64,
        registration: StaffRegistration,
    ) -> Result<Staff, AppError> {
        let email = registration.email.trim().to_lowercase();

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(
                "Email is already registered",
                json!({ "email": email }),
            ));
        }

        let staff = self
            .repository
            .create(NewStaff {
                pharmacy_id,
                email,
                name: registration.name,
                role: registration.role,
                password_hash: hash_password(&self.signing_secret, &registration.password)?,
            })
            .await?;

        tracing::info!(staff_id = staff.id, pharmacy_id, role = %staff.role, "staff account created");
        Ok(staff)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Staff>, AppError> {
        self.repository.find_by_email(email).await
    }

    /// Lists accounts of the caller's pharmacy. Admin only.
    pub async fn list(&self, caller: &StaffIdentity) -> Result<Vec<Staff>, AppError> {
        Self::require_admin(caller)?;
        self.repository.list(caller.pharmacy_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockStaffRepository;
    use crate::utils::password::verify_password;
    use chrono::Utc;

    const SECRET: &str = "test-signing-secret";

    fn caller(role: StaffRole) -> StaffIdentity {
        StaffIdentity {
            staff_id: 1,
            pharmacy_id: 10,
            email: "boss@pharmacy.test".to_string(),
            name: "Boss".to_string(),
            role,
        }
    }

    fn registration() -> StaffRegistration {
        StaffRegistration {
            email: "  New.Hire@Pharmacy.test ".to_string(),
            name: "New Hire".to_string(),
            role: StaffRole::Cashier,
            password: "longenough".to_string(),
        }
    }

    fn stored(new: NewStaff) -> Staff {
        Staff {
            id: 2,
            pharmacy_id: new.pharmacy_id,
            email: new.email,
            name: new.name,
            role: new.role,
            password_hash: new.password_hash,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_admin_creates_staff_in_own_pharmacy() {
        let mut repo = MockStaffRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "new.hire@pharmacy.test")
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|new| {
                new.pharmacy_id == 10
                    && new.email == "new.hire@pharmacy.test"
                    && verify_password(SECRET, "longenough", &new.password_hash)
            })
            .times(1)
            .returning(|new| Ok(stored(new)));

        let service = StaffService::new(Arc::new(repo), SECRET.to_string());
        let staff = service
            .create(&caller(StaffRole::Admin), registration())
            .await
            .unwrap();

        assert_eq!(staff.pharmacy_id, 10);
        assert_eq!(staff.role, StaffRole::Cashier);
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let mut repo = MockStaffRepository::new();
        repo.expect_create().never();
        repo.expect_list().never();

        let service = StaffService::new(Arc::new(repo), SECRET.to_string());

        let created = service
            .create(&caller(StaffRole::Pharmacist), registration())
            .await;
        assert!(matches!(created.unwrap_err(), AppError::Forbidden { .. }));

        let listed = service.list(&caller(StaffRole::Cashier)).await;
        assert!(matches!(listed.unwrap_err(), AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let mut repo = MockStaffRepository::new();
        repo.expect_find_by_email().returning(|email| {
            Ok(Some(stored(NewStaff {
                pharmacy_id: 10,
                email: email.to_string(),
                name: "Existing".to_string(),
                role: StaffRole::Cashier,
                password_hash: String::new(),
            })))
        });
        repo.expect_create().never();

        let service = StaffService::new(Arc::new(repo), SECRET.to_string());
        let result = service.register(10, registration()).await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }
}
