//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.
//! Protected handlers receive the caller as an `Extension<StaffIdentity>`
//! inserted by [`crate::api::middleware::auth`]; every tenant-scoped lookup
//! uses the caller's pharmacy id.

pub mod auth;
pub mod customers;
pub mod geo;
pub mod health;
pub mod orders;
pub mod pharmacy;
pub mod products;
pub mod staff;

pub use auth::{login_handler, logout_handler, me_handler};
pub use customers::{
    create_customer_handler, create_health_record_handler, customer_handler,
    customer_list_handler, health_record_list_handler, update_customer_handler,
};
pub use geo::{distance_handler, geocode_handler};
pub use health::health_handler;
pub use orders::{
    cancel_order_handler, complete_order_handler, create_order_handler, order_handler,
    order_list_handler,
};
pub use pharmacy::{pharmacy_handler, update_pharmacy_handler};
pub use products::{
    adjust_stock_handler, create_product_handler, delete_product_handler, product_handler,
    product_list_handler, update_product_handler,
};
pub use staff::{create_staff_handler, staff_list_handler};
