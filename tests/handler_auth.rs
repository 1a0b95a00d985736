mod common;

use axum::http::StatusCode;
use pharmacy_api::domain::entities::StaffRole;
use serde_json::json;
use sqlx::PgPool;

// ─── Rejected before the database ───────────────────────────────────────────

#[tokio::test]
async fn test_missing_bearer_token_is_unauthorized() {
    let server = common::make_server(common::create_offline_state());

    let response = server.get("/api/products").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("www-authenticate"), "Bearer");
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthorized() {
    let server = common::make_server(common::create_offline_state());

    let response = server
        .post("/api/orders")
        .add_header("Authorization", "Basic YWRtaW46YWRtaW4=")
        .json(&json!({ "items": [{ "product_id": 1, "quantity": 1 }] }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_malformed_payload() {
    let server = common::make_server(common::create_offline_state());

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "not-an-email", "password": "" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(json["error"]["details"].get("email").is_some());
    assert!(json["error"]["details"].get("password").is_some());
}

#[tokio::test]
async fn test_login_rejects_missing_fields() {
    let server = common::make_server(common::create_offline_state());

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "admin@pharmacy.test" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "validation_error"
    );
}

// ─── Against PostgreSQL ─────────────────────────────────────────────────────

#[sqlx::test]
async fn test_login_me_logout(pool: PgPool) {
    let (server, token, pharmacy_id) = common::setup_admin(pool).await;

    let me = server.get("/api/auth/me").authorization_bearer(&token).await;
    me.assert_status_ok();
    let json = me.json::<serde_json::Value>();
    assert_eq!(json["pharmacy_id"], pharmacy_id);
    assert_eq!(json["role"], "admin");

    server
        .post("/api/auth/logout")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get("/api/auth/me")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn test_login_wrong_password(pool: PgPool) {
    let pharmacy_id = common::create_test_pharmacy(&pool, "Central Pharmacy").await;
    common::create_test_staff(&pool, pharmacy_id, "ann@pharmacy.test", StaffRole::Cashier).await;
    let server = common::make_server(common::create_test_state(pool));

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "ann@pharmacy.test", "password": "wrong-password" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn test_unknown_token_is_unauthorized(pool: PgPool) {
    let server = common::make_server(common::create_test_state(pool));

    server
        .get("/api/products")
        .authorization_bearer("definitely-not-a-session-token")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn test_staff_management_is_admin_only(pool: PgPool) {
    let pharmacy_id = common::create_test_pharmacy(&pool, "Central Pharmacy").await;
    common::create_test_staff(&pool, pharmacy_id, "admin@pharmacy.test", StaffRole::Admin).await;
    common::create_test_staff(&pool, pharmacy_id, "cash@pharmacy.test", StaffRole::Cashier).await;
    let server = common::make_server(common::create_test_state(pool));

    let admin = common::login(&server, "admin@pharmacy.test").await;
    let cashier = common::login(&server, "cash@pharmacy.test").await;

    let new_staff = json!({
        "email": "new@pharmacy.test",
        "name": "New Pharmacist",
        "role": "pharmacist",
        "password": "long-enough-password"
    });

    server
        .post("/api/staff")
        .authorization_bearer(&cashier)
        .json(&new_staff)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let created = server
        .post("/api/staff")
        .authorization_bearer(&admin)
        .json(&new_staff)
        .await;
    created.assert_status(StatusCode::CREATED);
    assert!(created.json::<serde_json::Value>().get("password_hash").is_none());

    server
        .post("/api/staff")
        .authorization_bearer(&admin)
        .json(&new_staff)
        .await
        .assert_status(StatusCode::CONFLICT);

    let list = server.get("/api/staff").authorization_bearer(&admin).await;
    list.assert_status_ok();
    assert_eq!(
        list.json::<serde_json::Value>()["items"]
            .as_array()
            .unwrap()
            .len(),
        3
    );
}
