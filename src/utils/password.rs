//! Password hashing.
//!
//! Passwords are stored as Argon2id PHC strings
//! (`$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>`). The token signing secret
//! is mixed in as the Argon2 secret, so a leaked table alone cannot be
//! attacked offline.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde_json::json;

use crate::error::AppError;

const SALT_LEN: usize = 16;

fn hasher(secret: &str) -> Result<Argon2<'_>, argon2::Error> {
    Argon2::new_with_secret(
        secret.as_bytes(),
        Algorithm::Argon2id,
        Version::V0x13,
        Params::default(),
    )
}

/// Hashes a password with a fresh random salt.
pub fn hash_password(secret: &str, password: &str) -> Result<String, AppError> {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);

    let salt = SaltString::encode_b64(&salt).map_err(hash_error)?;
    let hash = hasher(secret)
        .map_err(hash_error)?
        .hash_password(password.as_bytes(), &salt)
        .map_err(hash_error)?;

    Ok(hash.to_string())
}

/// Checks a password against a stored hash. Malformed hashes never verify.
pub fn verify_password(secret: &str, password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    let Ok(argon2) = hasher(secret) else {
        return false;
    };

    argon2.verify_password(password.as_bytes(), &parsed).is_ok()
}

fn hash_error(e: impl std::fmt::Display) -> AppError {
    tracing::error!(error = %e, "password hashing failed");
    AppError::internal("Password hashing failed", json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let stored = hash_password("secret", "correct horse").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("secret", "correct horse", &stored));
        assert!(!verify_password("secret", "wrong horse", &stored));
        assert!(!verify_password("other-secret", "correct horse", &stored));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(
            hash_password("s", "pw").unwrap(),
            hash_password("s", "pw").unwrap()
        );
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("s", "pw", ""));
        assert!(!verify_password("s", "pw", "v1$00$00"));
        assert!(!verify_password("s", "pw", "$argon2id$garbage"));
    }

    #[test]
    fn test_fast_digest_formats_are_rejected() {
        // A bare salted SHA-256 digest must not pass as a stored password.
        assert!(!verify_password(
            "s",
            "pw",
            "v1$00112233445566778899aabbccddeeff$0000000000000000000000000000000000000000000000000000000000000000"
        ));
    }
}
