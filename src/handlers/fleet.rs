use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthUser,
    errors::ServiceError,
    handlers::common::{created_response, ok_response, validate_input, Paged, PaginationParams},
    services::fleet::{CreateDriverInput, CreateTripInput, CreateVehicleInput},
    AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, message = "Registration number cannot be empty"))]
    pub registration_no: String,
    #[validate(length(min = 1, message = "Vehicle type cannot be empty"))]
    pub vehicle_type: String,
    pub capacity_kg: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDriverRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "License number cannot be empty"))]
    pub license_no: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTripRequest {
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub from_location_id: Option<Uuid>,
    pub to_location_id: Option<Uuid>,
    pub trip_date: NaiveDate,
    pub distance_km: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusChangeRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TripFilters {
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub status: Option<String>,
}

pub fn vehicle_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:id", get(get_vehicle))
        .route("/:id/status", post(set_vehicle_status))
}

pub fn driver_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route("/:id", get(get_driver))
        .route("/:id/status", post(set_driver_status))
}

pub fn trip_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(create_trip))
        .route("/:id", get(get_trip))
        .route("/:id/status", post(transition_trip))
}

async fn create_vehicle(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateVehicleRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let vehicle = state
        .services
        .fleet
        .create_vehicle(CreateVehicleInput {
            registration_no: payload.registration_no,
            vehicle_type: payload.vehicle_type,
            capacity_kg: payload.capacity_kg,
        })
        .await?;
    Ok(created_response(vehicle))
}

async fn list_vehicles(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filter): Query<StatusFilter>,
    Query(page): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (items, total) = state
        .services
        .fleet
        .list_vehicles(filter.status, page.page, page.limit)
        .await?;
    Ok(ok_response(Paged::new(items, total, &page)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let vehicle = state.services.fleet.get_vehicle(id).await?;
    Ok(ok_response(vehicle))
}

async fn set_vehicle_status(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusChangeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let vehicle = state
        .services
        .fleet
        .set_vehicle_status(id, &payload.status)
        .await?;
    Ok(ok_response(vehicle))
}

async fn create_driver(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateDriverRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let driver = state
        .services
        .fleet
        .create_driver(CreateDriverInput {
            name: payload.name,
            phone: payload.phone,
            license_no: payload.license_no,
        })
        .await?;
    Ok(created_response(driver))
}

async fn list_drivers(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filter): Query<StatusFilter>,
    Query(page): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (items, total) = state
        .services
        .fleet
        .list_drivers(filter.status, page.page, page.limit)
        .await?;
    Ok(ok_response(Paged::new(items, total, &page)))
}

async fn get_driver(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let driver = state.services.fleet.get_driver(id).await?;
    Ok(ok_response(driver))
}

async fn set_driver_status(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusChangeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let driver = state
        .services
        .fleet
        .set_driver_status(id, &payload.status)
        .await?;
    Ok(ok_response(driver))
}

async fn create_trip(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateTripRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let trip = state
        .services
        .fleet
        .create_trip(CreateTripInput {
            vehicle_id: payload.vehicle_id,
            driver_id: payload.driver_id,
            from_location_id: payload.from_location_id,
            to_location_id: payload.to_location_id,
            trip_date: payload.trip_date,
            distance_km: payload.distance_km,
            notes: payload.notes,
        })
        .await?;
    Ok(created_response(trip))
}

async fn list_trips(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<TripFilters>,
    Query(page): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (items, total) = state
        .services
        .fleet
        .list_trips(
            filters.vehicle_id,
            filters.driver_id,
            filters.status,
            page.page,
            page.limit,
        )
        .await?;
    Ok(ok_response(Paged::new(items, total, &page)))
}

async fn get_trip(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let trip = state.services.fleet.get_trip(id).await?;
    Ok(ok_response(trip))
}

/// Move a trip through its lifecycle; illegal transitions return 400.
async fn transition_trip(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusChangeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let trip = state
        .services
        .fleet
        .transition_trip(id, &payload.status)
        .await?;
    Ok(ok_response(trip))
}
