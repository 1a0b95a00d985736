//! Shared validation rules.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

/// Phone numbers: optional leading `+`, then digits, spaces, dashes, parentheses.
pub static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ()-]{5,32}$").unwrap());

/// SKUs: letters, digits, `.`, `_`, `-`, starting with a letter or digit.
pub static SKU_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,63}$").unwrap());

/// A WGS84 coordinate in request bodies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct PointDto {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

/// Rejects strings that are empty after trimming.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// Checks a `location` field that may also be an explicit `null`.
pub fn valid_point(point: &PointDto) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&point.lat) && (-180.0..=180.0).contains(&point.lng) {
        Ok(())
    } else {
        Err(ValidationError::new("range").with_message("coordinates out of range".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+49 30 1234567"));
        assert!(PHONE_REGEX.is_match("(030) 123-45"));
        assert!(!PHONE_REGEX.is_match("call me"));
        assert!(!PHONE_REGEX.is_match("12"));
    }

    #[test]
    fn test_sku_regex() {
        assert!(SKU_REGEX.is_match("IBU-400"));
        assert!(SKU_REGEX.is_match("a1.b_2"));
        assert!(!SKU_REGEX.is_match("-leading"));
        assert!(!SKU_REGEX.is_match("has space"));
    }

    #[test]
    fn test_point_ranges() {
        assert!(PointDto { lat: 52.5, lng: 13.4 }.validate().is_ok());
        assert!(PointDto { lat: 91.0, lng: 0.0 }.validate().is_err());
        assert!(valid_point(&PointDto { lat: 0.0, lng: -181.0 }).is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x").is_ok());
        assert!(not_blank("   ").is_err());
    }
}
