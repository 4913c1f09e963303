mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseBackend, EntityTrait, PaginatorTrait, Statement};
use serde_json::json;
use wastetrack_api::{
    entities::stock_transfer, errors::ServiceError, services::transfers::TransferStockInput,
};

use common::{dec, TestApp};

#[tokio::test]
async fn transfer_debits_source_credits_destination_and_writes_ledger() {
    let app = TestApp::new().await;
    let source = app.create_location("North Godown", "storage_facility").await;
    let dest = app.create_location("South Godown", "storage_facility").await;
    app.seed_stock(source.id, "iron_scrap", dec(100)).await;

    let (status, body) = app
        .post(
            "/api/v1/transfers",
            json!({
                "from_location_id": source.id,
                "to_location_id": dest.id,
                "material": "iron_scrap",
                "quantity": "30",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert_eq!(app.stock_of(source.id, "iron_scrap").await, dec(70));
    assert_eq!(app.stock_of(dest.id, "iron_scrap").await, dec(30));

    let ledger_rows = stock_transfer::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count failed");
    assert_eq!(ledger_rows, 1);
}

#[tokio::test]
async fn transfer_with_insufficient_stock_changes_nothing() {
    let app = TestApp::new().await;
    let source = app.create_location("North Godown", "storage_facility").await;
    let dest = app.create_location("South Godown", "storage_facility").await;
    app.seed_stock(source.id, "iron_scrap", dec(20)).await;

    let (status, _) = app
        .post(
            "/api/v1/transfers",
            json!({
                "from_location_id": source.id,
                "to_location_id": dest.id,
                "material": "iron_scrap",
                "quantity": "30",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.stock_of(source.id, "iron_scrap").await, dec(20));
    assert_eq!(app.stock_of(dest.id, "iron_scrap").await, Decimal::ZERO);

    let ledger_rows = stock_transfer::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count failed");
    assert_eq!(ledger_rows, 0);
}

#[tokio::test]
async fn transfer_to_same_location_is_rejected() {
    let app = TestApp::new().await;
    let godown = app.create_location("North Godown", "storage_facility").await;
    app.seed_stock(godown.id, "iron_scrap", dec(20)).await;

    let (status, _) = app
        .post(
            "/api/v1/transfers",
            json!({
                "from_location_id": godown.id,
                "to_location_id": godown.id,
                "material": "iron_scrap",
                "quantity": "5",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.stock_of(godown.id, "iron_scrap").await, dec(20));
}

#[tokio::test]
async fn transfer_to_unknown_location_is_404_and_source_is_untouched() {
    let app = TestApp::new().await;
    let source = app.create_location("North Godown", "storage_facility").await;
    app.seed_stock(source.id, "iron_scrap", dec(20)).await;

    let (status, _) = app
        .post(
            "/api/v1/transfers",
            json!({
                "from_location_id": source.id,
                "to_location_id": uuid::Uuid::new_v4(),
                "material": "iron_scrap",
                "quantity": "5",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.stock_of(source.id, "iron_scrap").await, dec(20));
}

// Forces the ledger insert to fail after both stock writes succeeded, then
// checks that the stock writes rolled back with it.
#[tokio::test]
async fn failed_ledger_insert_rolls_back_stock_writes() {
    let app = TestApp::new().await;
    let source = app.create_location("North Godown", "storage_facility").await;
    let dest = app.create_location("South Godown", "storage_facility").await;
    app.seed_stock(source.id, "iron_scrap", dec(100)).await;

    app.state
        .db
        .execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "DROP TABLE stock_transfers".to_string(),
        ))
        .await
        .expect("failed to drop ledger table");

    let err = app
        .state
        .services
        .transfers
        .transfer_stock(
            uuid::Uuid::new_v4(),
            TransferStockInput {
                from_location_id: source.id,
                to_location_id: dest.id,
                material: "iron_scrap".to_string(),
                quantity: dec(30),
                notes: None,
            },
        )
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::DatabaseError(_));
    assert_eq!(app.stock_of(source.id, "iron_scrap").await, dec(100));
    assert_eq!(app.stock_of(dest.id, "iron_scrap").await, Decimal::ZERO);
}

#[tokio::test]
async fn list_transfers_scoped_to_either_side_of_the_move() {
    let app = TestApp::new().await;
    let a = app.create_location("Godown A", "storage_facility").await;
    let b = app.create_location("Godown B", "storage_facility").await;
    let c = app.create_location("Godown C", "storage_facility").await;
    app.seed_stock(a.id, "paper", dec(100)).await;
    app.seed_stock(b.id, "paper", dec(100)).await;

    for (from, to) in [(a.id, b.id), (b.id, c.id)] {
        let (status, _) = app
            .post(
                "/api/v1/transfers",
                json!({
                    "from_location_id": from,
                    "to_location_id": to,
                    "material": "paper",
                    "quantity": "10",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .get(&format!("/api/v1/transfers?location_id={}", b.id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(2));

    let (status, body) = app
        .get(&format!("/api/v1/transfers?location_id={}", a.id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(1));
}
