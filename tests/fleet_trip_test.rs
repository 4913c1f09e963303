mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::TestApp;

async fn create_vehicle(app: &TestApp, registration: &str) -> Value {
    let (status, body) = app
        .post(
            "/api/v1/vehicles",
            json!({
                "registration_no": registration,
                "vehicle_type": "pickup_truck",
                "capacity_kg": "1500",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    body["data"].clone()
}

async fn create_driver(app: &TestApp, license: &str) -> Value {
    let (status, body) = app
        .post(
            "/api/v1/drivers",
            json!({
                "name": "Ravi Kumar",
                "phone": "9876543210",
                "license_no": license,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    body["data"].clone()
}

async fn create_trip(app: &TestApp, vehicle: &Value, driver: &Value) -> (StatusCode, Value) {
    app.post(
        "/api/v1/trips",
        json!({
            "vehicle_id": vehicle["id"],
            "driver_id": driver["id"],
            "trip_date": "2026-08-25",
            "distance_km": "42.5",
        }),
    )
    .await
}

#[tokio::test]
async fn duplicate_vehicle_registration_is_409_case_insensitively() {
    let app = TestApp::new().await;
    create_vehicle(&app, "KA-01-AB-1234").await;

    // Registrations are uppercased on the way in.
    let (status, _) = app
        .post(
            "/api/v1/vehicles",
            json!({
                "registration_no": "ka-01-ab-1234",
                "vehicle_type": "pickup_truck",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn trip_lifecycle_happy_path() {
    let app = TestApp::new().await;
    let vehicle = create_vehicle(&app, "KA-01-AB-1234").await;
    let driver = create_driver(&app, "DL-990011").await;

    let (status, body) = create_trip(&app, &vehicle, &driver).await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert_eq!(body["data"]["status"], json!("planned"));
    let trip_id = body["data"]["id"].as_str().expect("trip id").to_string();

    let (status, body) = app
        .post(
            &format!("/api/v1/trips/{trip_id}/status"),
            json!({"status": "in_progress"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("in_progress"));

    let (status, body) = app
        .post(
            &format!("/api/v1/trips/{trip_id}/status"),
            json!({"status": "completed"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("completed"));
}

#[tokio::test]
async fn illegal_trip_transitions_are_rejected() {
    let app = TestApp::new().await;
    let vehicle = create_vehicle(&app, "KA-01-AB-1234").await;
    let driver = create_driver(&app, "DL-990011").await;

    let (_, body) = create_trip(&app, &vehicle, &driver).await;
    let trip_id = body["data"]["id"].as_str().expect("trip id").to_string();

    // planned -> completed skips in_progress.
    let (status, _) = app
        .post(
            &format!("/api/v1/trips/{trip_id}/status"),
            json!({"status": "completed"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Cancel, then try to resurrect.
    let (status, _) = app
        .post(
            &format!("/api/v1/trips/{trip_id}/status"),
            json!({"status": "cancelled"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            &format!("/api/v1/trips/{trip_id}/status"),
            json!({"status": "in_progress"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trips_require_an_active_vehicle_and_driver() {
    let app = TestApp::new().await;
    let vehicle = create_vehicle(&app, "KA-01-AB-1234").await;
    let driver = create_driver(&app, "DL-990011").await;

    let vehicle_id = vehicle["id"].as_str().expect("vehicle id").to_string();
    let (status, _) = app
        .post(
            &format!("/api/v1/vehicles/{vehicle_id}/status"),
            json!({"status": "maintenance"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = create_trip(&app, &vehicle, &driver).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trips_can_be_listed_by_status() {
    let app = TestApp::new().await;
    let vehicle = create_vehicle(&app, "KA-01-AB-1234").await;
    let driver = create_driver(&app, "DL-990011").await;

    let (_, body) = create_trip(&app, &vehicle, &driver).await;
    let trip_id = body["data"]["id"].as_str().expect("trip id").to_string();
    create_trip(&app, &vehicle, &driver).await;

    let (status, _) = app
        .post(
            &format!("/api/v1/trips/{trip_id}/status"),
            json!({"status": "in_progress"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/v1/trips?status=planned").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(1));

    let (status, body) = app.get("/api/v1/trips?status=in_progress").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(1));
}
