//! Bearer token generation and hashing.
//!
//! Tokens are opaque random strings handed to the client once. Only their
//! HMAC-SHA256 (keyed by the server signing secret) is stored, so a read-only
//! database leak does not yield usable tokens.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

pub(crate) type HmacSha256 = Hmac<Sha256>;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated bearer tokens.
pub const TOKEN_LEN: usize = 48;

/// Generates a random alphanumeric token of [`TOKEN_LEN`] characters.
pub fn generate_token() -> String {
    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes a raw token with HMAC-SHA256 using the signing secret.
///
/// Returns a 64-character lowercase hex-encoded MAC.
pub fn hash_token(secret: &str, token: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_hash_token_consistency() {
        let hash1 = hash_token("secret", "test-token");
        let hash2 = hash_token("secret", "test-token");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_hash_token_secret_matters() {
        assert_ne!(hash_token("secret-a", "token"), hash_token("secret-b", "token"));
        assert_ne!(hash_token("secret", "token1"), hash_token("secret", "token2"));
    }
}
