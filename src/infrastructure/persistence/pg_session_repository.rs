//! PostgreSQL implementation of the session repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewSession, StaffIdentity};
use crate::domain::repositories::SessionRepository;
use crate::error::AppError;

/// Stores hashed bearer tokens and resolves them to staff identities.
pub struct PgSessionRepository {
    pool: Arc<PgPool>,
}

impl PgSessionRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, session: NewSession) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO staff_sessions (staff_id, token_hash, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(session.staff_id)
        .bind(session.token_hash)
        .bind(session.expires_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find_identity(&self, token_hash: &str) -> Result<Option<StaffIdentity>, AppError> {
        let identity = sqlx::query_as::<_, StaffIdentity>(
            r#"
            SELECT s.id AS staff_id, s.pharmacy_id, s.email, s.name, s.role
            FROM staff_sessions ss
            JOIN staff s ON s.id = ss.staff_id
            WHERE ss.token_hash = $1
              AND ss.revoked_at IS NULL
              AND ss.expires_at > NOW()
              AND s.active
            "#,
        )
        .bind(token_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(identity)
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE staff_sessions SET revoked_at = NOW() WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(token_hash)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
