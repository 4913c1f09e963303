use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthUser,
    errors::ServiceError,
    handlers::common::{
        created_response, no_content_response, ok_response, validate_input, Paged, PaginationParams,
    },
    services::locations::{CreateLocationInput, UpdateLocationInput},
    AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLocationRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    /// storage_facility | collection_point
    pub location_type: String,
    #[validate(length(min = 1, message = "District cannot be empty"))]
    pub district: String,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLocationRequest {
    pub name: Option<String>,
    pub district: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationFilters {
    pub location_type: Option<String>,
    pub district: Option<String>,
}

pub fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route(
            "/:id",
            get(get_location).put(update_location).delete(delete_location),
        )
}

async fn create_location(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateLocationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let location = state
        .services
        .locations
        .create_location(CreateLocationInput {
            name: payload.name,
            location_type: payload.location_type,
            district: payload.district,
            address: payload.address,
            contact_name: payload.contact_name,
            contact_phone: payload.contact_phone,
        })
        .await?;
    Ok(created_response(location))
}

async fn list_locations(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<LocationFilters>,
    Query(page): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (items, total) = state
        .services
        .locations
        .list_locations(filters.location_type, filters.district, page.page, page.limit)
        .await?;
    Ok(ok_response(Paged::new(items, total, &page)))
}

async fn get_location(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let location = state.services.locations.get_location(id).await?;
    Ok(ok_response(location))
}

async fn update_location(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let location = state
        .services
        .locations
        .update_location(
            id,
            UpdateLocationInput {
                name: payload.name,
                district: payload.district,
                address: payload.address,
                contact_name: payload.contact_name,
                contact_phone: payload.contact_phone,
            },
        )
        .await?;
    Ok(ok_response(location))
}

/// Deleting a location still holding inventory returns 409.
async fn delete_location(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.locations.delete_location(id).await?;
    Ok(no_content_response())
}
