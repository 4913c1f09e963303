//! WasteTrack API Library
//!
//! Core functionality for the WasteTrack back-office API: locations,
//! collections, inventory, sales, stock transfers, expenses, and fleet.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use std::sync::Arc;

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use utoipa::ToSchema;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
    pub auth: Arc<auth::AuthService>,
}

impl auth::AuthServiceProvider for AppState {
    fn auth_service(&self) -> &Arc<auth::AuthService> {
        &self.auth
    }
}

/// Standard response envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(msg.into()),
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let db_ok = state.db.ping().await.is_ok();
    Json(json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "database": if db_ok { "up" } else { "down" },
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Versioned API surface. Everything except `/auth/login` sits behind the
/// bearer-token extractor.
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", handlers::users::public_user_routes())
        .nest("/users", handlers::users::user_routes())
        .nest("/locations", handlers::locations::location_routes())
        .nest("/inventory", handlers::inventory::inventory_routes())
        .nest("/collections", handlers::collections::collection_routes())
        .nest("/sales", handlers::sales::sale_routes())
        .nest("/transfers", handlers::transfers::transfer_routes())
        .nest("/expenses", handlers::expenses::expense_routes())
        .nest("/vehicles", handlers::fleet::vehicle_routes())
        .nest("/drivers", handlers::fleet::driver_routes())
        .nest("/trips", handlers::fleet::trip_routes())
        .nest("/rates", handlers::rates::rate_routes())
}

/// Builds the full application router: health probe, v1 API, Swagger UI,
/// request tracing and compression.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "wastetrack-api up" }))
        .route("/health", get(health))
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}
