mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use sea_orm::{ConnectionTrait, DatabaseBackend, EntityTrait, PaginatorTrait, Statement};
use serde_json::json;
use wastetrack_api::{entities::sale, errors::ServiceError, services::sales::RecordSaleInput};

use common::{dec, TestApp};

fn sale_payload(location_id: uuid::Uuid, quantity: &str) -> serde_json::Value {
    json!({
        "location_id": location_id,
        "buyer_name": "Acme Recyclers",
        "material": "iron_scrap",
        "quantity": quantity,
        "unit": "kg",
        "sale_amount": "5000.00",
        "payment_status": "paid",
    })
}

#[tokio::test]
async fn sale_debits_stock_and_writes_ledger_row() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;
    app.seed_stock(godown.id, "iron_scrap", dec(100)).await;

    let (status, body) = app
        .post("/api/v1/sales", sale_payload(godown.id, "60"))
        .await;

    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert_eq!(app.stock_of(godown.id, "iron_scrap").await, dec(40));
    assert_eq!(body["data"]["payment_status"], json!("paid"));

    let ledger_rows = sale::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count failed");
    assert_eq!(ledger_rows, 1);
}

#[tokio::test]
async fn sale_beyond_on_hand_is_422_and_writes_nothing() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;
    app.seed_stock(godown.id, "iron_scrap", dec(50)).await;

    let (status, _) = app
        .post("/api/v1/sales", sale_payload(godown.id, "80"))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.stock_of(godown.id, "iron_scrap").await, dec(50));

    let ledger_rows = sale::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count failed");
    assert_eq!(ledger_rows, 0);
}

#[tokio::test]
async fn sale_draining_stock_to_zero_succeeds() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;
    app.seed_stock(godown.id, "iron_scrap", dec(70)).await;

    let (status, _) = app
        .post("/api/v1/sales", sale_payload(godown.id, "70"))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        app.stock_of(godown.id, "iron_scrap").await,
        rust_decimal::Decimal::ZERO
    );
}

#[tokio::test]
async fn unknown_payment_status_is_rejected() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;
    app.seed_stock(godown.id, "iron_scrap", dec(100)).await;

    let mut payload = sale_payload(godown.id, "10");
    payload["payment_status"] = json!("maybe_later");

    let (status, _) = app.post("/api/v1/sales", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.stock_of(godown.id, "iron_scrap").await, dec(100));
}

// Forces the ledger insert to fail after the stock debit succeeded, then
// checks that the debit rolled back with it.
#[tokio::test]
async fn failed_ledger_insert_rolls_back_the_stock_debit() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;
    app.seed_stock(godown.id, "iron_scrap", dec(100)).await;

    app.state
        .db
        .execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "DROP TABLE sales".to_string(),
        ))
        .await
        .expect("failed to drop ledger table");

    let err = app
        .state
        .services
        .sales
        .record_sale(
            uuid::Uuid::new_v4(),
            RecordSaleInput {
                location_id: godown.id,
                buyer_name: "Acme Recyclers".to_string(),
                material: "iron_scrap".to_string(),
                quantity: dec(60),
                unit: "kg".to_string(),
                sale_amount: dec(5000),
                payment_status: "paid".to_string(),
                amount_due: rust_decimal::Decimal::ZERO,
                notes: None,
            },
        )
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::DatabaseError(_));
    assert_eq!(app.stock_of(godown.id, "iron_scrap").await, dec(100));
}

#[tokio::test]
async fn sales_can_be_listed_by_payment_status() {
    let app = TestApp::new().await;
    let godown = app.create_location("Main Godown", "storage_facility").await;
    app.seed_stock(godown.id, "iron_scrap", dec(100)).await;

    let (status, _) = app
        .post("/api/v1/sales", sale_payload(godown.id, "10"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let mut pending = sale_payload(godown.id, "10");
    pending["payment_status"] = json!("pending");
    pending["amount_due"] = json!("5000.00");
    let (status, _) = app.post("/api/v1/sales", pending).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.get("/api/v1/sales?payment_status=pending").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(1));
    assert_eq!(body["data"]["items"][0]["payment_status"], json!("pending"));
}
