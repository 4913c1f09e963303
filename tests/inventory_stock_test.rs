mod common;

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;
use wastetrack_api::{
    errors::ServiceError,
    services::inventory::{apply_adjustment, StockDirection},
};

use common::{dec, operator_token, TestApp};

#[tokio::test]
async fn decrease_beyond_on_hand_fails_and_leaves_stock_untouched() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;
    app.seed_stock(godown.id, "iron_scrap", dec(50)).await;

    let err = apply_adjustment(
        &*app.state.db,
        godown.id,
        "iron_scrap",
        dec(80),
        StockDirection::Decrease,
    )
    .await
    .unwrap_err();

    assert_matches!(err, ServiceError::InsufficientStock(_));
    assert_eq!(app.stock_of(godown.id, "iron_scrap").await, dec(50));
}

#[tokio::test]
async fn decrease_to_exactly_zero_succeeds() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;
    app.seed_stock(godown.id, "paper", dec(70)).await;

    let level = apply_adjustment(
        &*app.state.db,
        godown.id,
        "paper",
        dec(70),
        StockDirection::Decrease,
    )
    .await
    .expect("draining to zero must succeed");

    assert_eq!(level.quantity, Decimal::ZERO);

    // The row now reads zero; a further decrease fails.
    let err = apply_adjustment(
        &*app.state.db,
        godown.id,
        "paper",
        dec(1),
        StockDirection::Decrease,
    )
    .await
    .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientStock(_));
}

#[tokio::test]
async fn decrease_with_no_projection_row_fails() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;

    let err = apply_adjustment(
        &*app.state.db,
        godown.id,
        "never_stocked",
        dec(5),
        StockDirection::Decrease,
    )
    .await
    .unwrap_err();

    assert_matches!(err, ServiceError::InsufficientStock(_));
}

#[tokio::test]
async fn increase_creates_projection_row_lazily() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;

    assert_eq!(app.stock_of(godown.id, "plastic").await, Decimal::ZERO);

    let level = apply_adjustment(
        &*app.state.db,
        godown.id,
        "plastic",
        dec(12),
        StockDirection::Increase,
    )
    .await
    .expect("first increase creates the row");

    assert_eq!(level.quantity, dec(12));
    assert_eq!(app.stock_of(godown.id, "plastic").await, dec(12));
}

#[tokio::test]
async fn non_positive_adjustments_are_rejected() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;

    for quantity in [Decimal::ZERO, dec(-3)] {
        let err = apply_adjustment(
            &*app.state.db,
            godown.id,
            "iron_scrap",
            quantity,
            StockDirection::Increase,
        )
        .await
        .unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(_));
    }
}

#[tokio::test]
async fn missing_level_reads_as_zero_over_http() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;

    let uri = format!("/api/v1/inventory/{}/copper", godown.id);
    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], json!("0"));
}

#[tokio::test]
async fn direct_adjustment_is_admin_only() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;
    let token = operator_token(&app).await;

    let payload = json!({
        "location_id": godown.id,
        "material": "iron_scrap",
        "quantity": "10",
        "direction": "increase",
    });

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/inventory/adjust",
            Some(&token),
            Some(payload.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.stock_of(godown.id, "iron_scrap").await, Decimal::ZERO);

    let (status, _) = app.post("/api/v1/inventory/adjust", payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.stock_of(godown.id, "iron_scrap").await, dec(10));
}

#[tokio::test]
async fn insufficient_stock_maps_to_422_over_http() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;
    app.seed_stock(godown.id, "iron_scrap", dec(50)).await;

    let (status, body) = app
        .post(
            "/api/v1/inventory/adjust",
            json!({
                "location_id": godown.id,
                "material": "iron_scrap",
                "quantity": "80",
                "direction": "decrease",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Unprocessable Entity");
    assert_eq!(app.stock_of(godown.id, "iron_scrap").await, dec(50));
}

#[tokio::test]
async fn adjustment_on_unknown_location_is_isolated_per_pair() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;
    let other = Uuid::new_v4();
    app.seed_stock(godown.id, "iron_scrap", dec(30)).await;

    // Same material at a different location id has its own row.
    let err = apply_adjustment(
        &*app.state.db,
        other,
        "iron_scrap",
        dec(1),
        StockDirection::Decrease,
    )
    .await
    .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientStock(_));
    assert_eq!(app.stock_of(godown.id, "iron_scrap").await, dec(30));
}
