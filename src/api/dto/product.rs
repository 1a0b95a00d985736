//! DTOs for the product catalog.

use serde::Deserialize;
use validator::Validate;

use super::common::{SKU_REGEX, not_blank};
use crate::domain::entities::{NewProduct, ProductPatch};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(regex(path = *SKU_REGEX, message = "Invalid SKU"))]
    pub sku: String,

    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 0, max = 100_000_000))]
    pub price_cents: i64,

    #[serde(default)]
    #[validate(range(min = 0, max = 1_000_000))]
    pub stock: i32,

    #[serde(default)]
    pub requires_prescription: bool,
}

impl CreateProductRequest {
    pub fn into_new_product(self, pharmacy_id: i64) -> NewProduct {
        NewProduct {
            pharmacy_id,
            sku: self.sku,
            name: self.name.trim().to_string(),
            description: self.description,
            price_cents: self.price_cents,
            stock: self.stock,
            requires_prescription: self.requires_prescription,
        }
    }
}

/// Request body for `PATCH /api/products/{id}`. Stock changes go through
/// the stock endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(regex(path = *SKU_REGEX, message = "Invalid SKU"))]
    pub sku: Option<String>,

    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(range(min = 0, max = 100_000_000))]
    pub price_cents: Option<i64>,

    pub requires_prescription: Option<bool>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(req: UpdateProductRequest) -> Self {
        ProductPatch {
            sku: req.sku,
            name: req.name.map(|s| s.trim().to_string()),
            description: req.description,
            price_cents: req.price_cents,
            requires_prescription: req.requires_prescription,
        }
    }
}

/// Request body for `POST /api/products/{id}/stock`.
#[derive(Debug, Deserialize, Validate)]
pub struct StockAdjustmentRequest {
    /// Units received (positive) or written off (negative).
    #[validate(range(min = -1_000_000, max = 1_000_000))]
    pub delta: i32,

    #[validate(length(max = 200))]
    pub reason: Option<String>,
}
