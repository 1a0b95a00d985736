//! API route configuration.
//!
//! Everything except login requires Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    adjust_stock_handler, cancel_order_handler, complete_order_handler, create_customer_handler,
    create_health_record_handler, create_order_handler, create_product_handler,
    create_staff_handler, customer_handler, customer_list_handler, delete_product_handler,
    distance_handler, geocode_handler, health_record_list_handler, login_handler, logout_handler,
    me_handler, order_handler, order_list_handler, pharmacy_handler, product_handler,
    product_list_handler, staff_list_handler, update_customer_handler, update_pharmacy_handler,
    update_product_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes reachable without a token.
///
/// # Endpoints
///
/// - `POST /auth/login` - Exchange credentials for a bearer token
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login_handler))
}

/// All other API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /auth/me`                      - The authenticated staff member
/// - `POST   /auth/logout`                  - Revoke the current token
/// - `GET    /pharmacy`                     - Pharmacy profile
/// - `PATCH  /pharmacy`                     - Update the profile (admin)
/// - `GET    /staff`                        - List staff (admin)
/// - `POST   /staff`                        - Create a staff account (admin)
/// - `GET    /products`                     - Search products (paginated)
/// - `POST   /products`                     - Add a product
/// - `GET    /products/{id}`                - Product details
/// - `PATCH  /products/{id}`                - Partially update a product
/// - `DELETE /products/{id}`                - Soft-delete a product
/// - `POST   /products/{id}/stock`          - Receive or write off stock
/// - `GET    /customers`                    - Search customers (paginated)
/// - `POST   /customers`                    - Register a customer
/// - `GET    /customers/{id}`               - Customer details
/// - `PATCH  /customers/{id}`               - Partially update a customer
/// - `GET    /customers/{id}/health-records` - Health history
/// - `POST   /customers/{id}/health-records` - Add a health record
/// - `GET    /orders`                       - List orders (paginated, by status)
/// - `POST   /orders`                       - Place an order
/// - `GET    /orders/{id}`                  - Order with lines
/// - `POST   /orders/{id}/complete`         - Complete a pending order
/// - `POST   /orders/{id}/cancel`           - Cancel a pending order, restocking items
/// - `POST   /geo/geocode`                  - Geocode an address
/// - `POST   /geo/distance`                 - Distance matrix
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me_handler))
        .route("/auth/logout", post(logout_handler))
        .route(
            "/pharmacy",
            get(pharmacy_handler).patch(update_pharmacy_handler),
        )
        .route("/staff", get(staff_list_handler).post(create_staff_handler))
        .route(
            "/products",
            get(product_list_handler).post(create_product_handler),
        )
        .route(
            "/products/{id}",
            get(product_handler)
                .patch(update_product_handler)
                .delete(delete_product_handler),
        )
        .route("/products/{id}/stock", post(adjust_stock_handler))
        .route(
            "/customers",
            get(customer_list_handler).post(create_customer_handler),
        )
        .route(
            "/customers/{id}",
            get(customer_handler).patch(update_customer_handler),
        )
        .route(
            "/customers/{id}/health-records",
            get(health_record_list_handler).post(create_health_record_handler),
        )
        .route(
            "/orders",
            get(order_list_handler).post(create_order_handler),
        )
        .route("/orders/{id}", get(order_handler))
        .route("/orders/{id}/complete", post(complete_order_handler))
        .route("/orders/{id}/cancel", post(cancel_order_handler))
        .route("/geo/geocode", post(geocode_handler))
        .route("/geo/distance", post(distance_handler))
}
