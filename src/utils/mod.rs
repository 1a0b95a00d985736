//! Credential helpers shared by the API and the admin CLI.
//!
//! - [`token`] - opaque bearer token generation and hashing
//! - [`password`] - salted password hashing and verification

pub mod password;
pub mod token;
