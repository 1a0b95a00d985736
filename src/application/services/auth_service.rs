//! Staff login and bearer token authentication.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{NewSession, StaffIdentity};
use crate::domain::repositories::{SessionRepository, StaffRepository};
use crate::error::AppError;
use crate::utils::password::verify_password;
use crate::utils::token::{generate_token, hash_token};

/// A freshly issued session. The raw token is only ever available here.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub staff: StaffIdentity,
}

/// Service for logging staff in and authenticating API requests via Bearer
/// tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
pub struct AuthService<S: StaffRepository, R: SessionRepository> {
    staff_repository: Arc<S>,
    session_repository: Arc<R>,
    signing_secret: String,
    session_ttl: TimeDelta,
}

impl<S: StaffRepository, R: SessionRepository> AuthService<S, R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key for tokens and passwords; changing it
    ///   invalidates every session and password
    /// - `session_ttl_hours` - lifetime of issued tokens
    pub fn new(
        staff_repository: Arc<S>,
        session_repository: Arc<R>,
        signing_secret: String,
        session_ttl_hours: i64,
    ) -> Self {
        Self {
            staff_repository,
            session_repository,
            signing_secret,
            session_ttl: TimeDelta::hours(session_ttl_hours),
        }
    }

    /// Verifies credentials and issues a new session token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for an unknown email, a wrong password
    /// or a deactivated account. The response does not say which.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AppError> {
        let invalid = || {
            AppError::unauthorized(
                "Invalid email or password",
                json!({ "reason": "Credentials were not accepted" }),
            )
        };

        let staff = self
            .staff_repository
            .find_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        if !staff.active || !verify_password(&self.signing_secret, password, &staff.password_hash) {
            tracing::info!(staff_id = staff.id, "rejected login attempt");
            return Err(invalid());
        }

        let token = generate_token();
        let expires_at = Utc::now() + self.session_ttl;

        self.session_repository
            .create(NewSession {
                staff_id: staff.id,
                token_hash: hash_token(&self.signing_secret, &token),
                expires_at,
            })
            .await?;

        tracing::info!(staff_id = staff.id, pharmacy_id = staff.pharmacy_id, "staff logged in");

        Ok(IssuedSession {
            token,
            expires_at,
            staff: staff.identity(),
        })
    }

    /// Resolves a raw bearer token to the staff member it belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown, expired,
    /// revoked, or its account is deactivated.
    pub async fn authenticate(&self, token: &str) -> Result<StaffIdentity, AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        self.session_repository
            .find_identity(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "Invalid, expired or revoked token" }),
                )
            })
    }

    /// Revokes the session behind `token`. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        let token_hash = hash_token(&self.signing_secret, token);
        self.session_repository.revoke(&token_hash).await?;
        Ok(())
    }
}
