use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthUser,
    errors::ServiceError,
    handlers::common::{created_response, ok_response, validate_input, Paged, PaginationParams},
    services::collections::RecordCollectionInput,
    AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordCollectionRequest {
    pub location_id: Uuid,
    #[validate(length(min = 1, message = "Material cannot be empty"))]
    pub material: String,
    pub quantity: Decimal,
    #[validate(length(min = 1, message = "Unit cannot be empty"))]
    pub unit: String,
    pub amount_paid: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionFilters {
    pub location_id: Option<Uuid>,
    pub material: Option<String>,
}

pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_collections).post(record_collection))
        .route("/:id", get(get_collection))
}

/// Record a material collection. The ledger row and the stock credit commit
/// together; if the collection site is a collection point, stock lands at a
/// storage facility.
#[utoipa::path(
    post,
    path = "/api/v1/collections",
    request_body = RecordCollectionRequest,
    responses(
        (status = 201, description = "Collection recorded"),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 404, description = "Location not found", body = crate::errors::ErrorResponse)
    ),
    tag = "collections"
)]
pub async fn record_collection(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RecordCollectionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let recorded = state
        .services
        .collections
        .record_collection(
            user.user_id,
            RecordCollectionInput {
                location_id: payload.location_id,
                material: payload.material,
                quantity: payload.quantity,
                unit: payload.unit,
                amount_paid: payload.amount_paid,
                notes: payload.notes,
            },
        )
        .await?;
    Ok(created_response(recorded))
}

#[utoipa::path(
    get,
    path = "/api/v1/collections",
    params(PaginationParams),
    responses((status = 200, description = "Collections returned")),
    tag = "collections"
)]
pub async fn list_collections(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<CollectionFilters>,
    Query(page): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (items, total) = state
        .services
        .collections
        .list_collections(filters.location_id, filters.material, page.page, page.limit)
        .await?;
    Ok(ok_response(Paged::new(items, total, &page)))
}

async fn get_collection(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let collection = state.services.collections.get_collection(id).await?;
    Ok(ok_response(collection))
}
