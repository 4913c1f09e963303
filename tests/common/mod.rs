#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;
use wastetrack_api::{
    auth::{AuthConfig, AuthService},
    config::AppConfig,
    db,
    entities::location,
    events::{self, EventSender},
    handlers::AppServices,
    services::{
        inventory::{apply_adjustment, StockDirection},
        locations::CreateLocationInput,
    },
    AppState,
};

pub const TEST_JWT_SECRET: &str =
    "test_secret_key_for_testing_purposes_only_padded_out_to_sixty_four_chars";
pub const ADMIN_EMAIL: &str = "admin@wastetrack.test";
pub const ADMIN_PASSWORD: &str = "admin-test-password";

/// Test harness: application state backed by an in-memory SQLite database,
/// with a bootstrapped admin account and a valid bearer token.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub admin_token: String,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:",
            TEST_JWT_SECRET,
            3600,
            "127.0.0.1",
            18_080,
            "test",
        );
        // A single connection keeps all queries on the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");
        let db_arc = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let auth_cfg = AuthConfig::new(TEST_JWT_SECRET.to_string(), Duration::from_secs(3600))
            .expect("failed to create auth config");
        let auth = Arc::new(AuthService::new(auth_cfg));

        let services = AppServices::new(db_arc.clone(), event_sender.clone(), auth.clone());
        services
            .users
            .bootstrap_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .expect("failed to bootstrap admin");
        let (admin_token, _admin) = services
            .users
            .login(ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .expect("admin login failed");

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
            auth,
        };
        let router = wastetrack_api::app_router(state.clone());

        Self {
            router,
            state,
            admin_token,
            _event_task: event_task,
        }
    }

    /// Sends a request through the router and returns status plus parsed body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json_body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json_body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(self.admin_token.as_str()), None)
            .await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            uri,
            Some(self.admin_token.as_str()),
            Some(body),
        )
        .await
    }

    /// Creates a location directly through the service layer.
    pub async fn create_location(&self, name: &str, location_type: &str) -> location::Model {
        self.state
            .services
            .locations
            .create_location(CreateLocationInput {
                name: name.to_string(),
                location_type: location_type.to_string(),
                district: "Test District".to_string(),
                address: None,
                contact_name: None,
                contact_phone: None,
            })
            .await
            .expect("failed to create location")
    }

    /// Seeds on-hand stock for a (location, material) pair.
    pub async fn seed_stock(&self, location_id: Uuid, material: &str, quantity: Decimal) {
        apply_adjustment(
            &*self.state.db,
            location_id,
            material,
            quantity,
            StockDirection::Increase,
        )
        .await
        .expect("failed to seed stock");
    }

    /// Current on-hand quantity; a missing projection row reads as zero.
    pub async fn stock_of(&self, location_id: Uuid, material: &str) -> Decimal {
        self.state
            .services
            .inventory
            .get_level(location_id, material)
            .await
            .expect("failed to read stock")
            .map(|level| level.quantity)
            .unwrap_or(Decimal::ZERO)
    }
}

pub fn dec(value: i64) -> Decimal {
    Decimal::new(value * 1000, 3)
}

/// Provisions an operator account via the API and returns its bearer token.
pub async fn operator_token(app: &TestApp) -> String {
    let (status, _) = app
        .post(
            "/api/v1/users",
            json!({
                "email": "operator@wastetrack.test",
                "password": "operator-password",
                "full_name": "Test Operator",
                "role": "operator",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "operator provisioning failed");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({
                "email": "operator@wastetrack.test",
                "password": "operator-password",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "operator login failed: {body}");
    body["data"]["token"]
        .as_str()
        .expect("missing token")
        .to_string()
}
