//! Repository trait for bearer token sessions.

use crate::domain::entities::{NewSession, StaffIdentity};
use crate::error::AppError;
use async_trait::async_trait;

/// Sessions are stored by token hash only; raw tokens never reach the database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: NewSession) -> Result<(), AppError>;

    /// Resolves a token hash to the staff member it was issued to.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the session is unknown, revoked, expired, or the staff
    /// account has been deactivated.
    async fn find_identity(&self, token_hash: &str) -> Result<Option<StaffIdentity>, AppError>;

    /// Revokes a session. Returns `false` if it was unknown or already revoked.
    async fn revoke(&self, token_hash: &str) -> Result<bool, AppError>;
}
