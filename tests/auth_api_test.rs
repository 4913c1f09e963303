mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{operator_token, TestApp, ADMIN_EMAIL};

#[tokio::test]
async fn mutations_require_a_bearer_token() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;

    let payload = json!({
        "location_id": godown.id,
        "material": "paper",
        "quantity": "10",
        "unit": "kg",
        "amount_paid": "100.00",
    });

    let (status, _) = app
        .request(Method::POST, "/api/v1/collections", None, Some(payload))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // No ledger row, no stock movement.
    assert_eq!(
        app.stock_of(godown.id, "paper").await,
        rust_decimal::Decimal::ZERO
    );
}

#[tokio::test]
async fn garbage_tokens_are_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(
            Method::GET,
            "/api/v1/inventory",
            Some("not-a-real-token"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({
                "email": ADMIN_EMAIL,
                "password": "wrong-password",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_can_provision_operators_who_cannot_provision() {
    let app = TestApp::new().await;
    let token = operator_token(&app).await;

    // The operator's token works for normal reads.
    let (status, body) = app
        .request(Method::GET, "/api/v1/users/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], json!("operator@wastetrack.test"));
    assert_eq!(body["data"]["role"], json!("operator"));

    // But provisioning stays admin-only.
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/users",
            Some(&token),
            Some(json!({
                "email": "second@wastetrack.test",
                "password": "some-password",
                "full_name": "Second User",
                "role": "operator",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_email_provisioning_is_409() {
    let app = TestApp::new().await;

    let payload = json!({
        "email": "dupe@wastetrack.test",
        "password": "some-password",
        "full_name": "Dupe User",
        "role": "manager",
    });

    let (status, _) = app.post("/api/v1/users", payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.post("/api/v1/users", payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn password_hash_never_leaves_the_api() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/users/me").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
}
