mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{dec, TestApp};

#[tokio::test]
async fn location_holding_stock_cannot_be_deleted() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;
    app.seed_stock(godown.id, "iron_scrap", dec(10)).await;

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/locations/{}", godown.id),
            Some(app.admin_token.as_str()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Drain the stock and the delete goes through.
    let (status, _) = app
        .post(
            "/api/v1/inventory/adjust",
            json!({
                "location_id": godown.id,
                "material": "iron_scrap",
                "quantity": "10",
                "direction": "decrease",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/locations/{}", godown.id),
            Some(app.admin_token.as_str()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unknown_location_type_is_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post(
            "/api/v1/locations",
            json!({
                "name": "Mystery Site",
                "location_type": "warehouse",
                "district": "Central",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn current_rate_picks_the_latest_card_in_force() {
    let app = TestApp::new().await;

    for (rate, effective_from) in [("40.00", "2026-01-01"), ("45.00", "2026-06-01")] {
        let (status, _) = app
            .post(
                "/api/v1/rates",
                json!({
                    "material": "iron_scrap",
                    "unit": "kg",
                    "buy_rate": rate,
                    "sell_rate": "55.00",
                    "effective_from": effective_from,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Between the two cards, the January rate is in force.
    let (status, body) = app
        .get("/api/v1/rates/current/iron_scrap?on=2026-03-15")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["buy_rate"], json!("40.00"));

    // After June, the newer card wins.
    let (status, body) = app
        .get("/api/v1/rates/current/iron_scrap?on=2026-07-01")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["buy_rate"], json!("45.00"));

    // Before any card exists, there is no rate.
    let (status, _) = app
        .get("/api/v1/rates/current/iron_scrap?on=2025-12-31")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expenses_validate_amount_and_optional_location() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;

    let (status, _) = app
        .post(
            "/api/v1/expenses",
            json!({
                "category": "fuel",
                "amount": "-100.00",
                "incurred_on": "2026-08-25",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/v1/expenses",
            json!({
                "category": "fuel",
                "amount": "1200.00",
                "location_id": godown.id,
                "incurred_on": "2026-08-25",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post(
            "/api/v1/expenses",
            json!({
                "category": "repairs",
                "amount": "300.00",
                "location_id": uuid::Uuid::new_v4(),
                "incurred_on": "2026-08-25",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/api/v1/expenses?category=fuel").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(1));
}
