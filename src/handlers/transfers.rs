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
    services::transfers::TransferStockInput,
    AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TransferStockRequest {
    pub from_location_id: Uuid,
    pub to_location_id: Uuid,
    #[validate(length(min = 1, message = "Material cannot be empty"))]
    pub material: String,
    pub quantity: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransferFilters {
    pub location_id: Option<Uuid>,
}

pub fn transfer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transfers).post(transfer_stock))
        .route("/:id", get(get_transfer))
}

/// Move stock between locations. Debit, credit, and ledger row commit as one
/// transaction: either the whole transfer lands or none of it does.
#[utoipa::path(
    post,
    path = "/api/v1/transfers",
    request_body = TransferStockRequest,
    responses(
        (status = 201, description = "Stock transferred"),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock at source", body = crate::errors::ErrorResponse)
    ),
    tag = "transfers"
)]
pub async fn transfer_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<TransferStockRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let transfer = state
        .services
        .transfers
        .transfer_stock(
            user.user_id,
            TransferStockInput {
                from_location_id: payload.from_location_id,
                to_location_id: payload.to_location_id,
                material: payload.material,
                quantity: payload.quantity,
                notes: payload.notes,
            },
        )
        .await?;
    Ok(created_response(transfer))
}

#[utoipa::path(
    get,
    path = "/api/v1/transfers",
    params(PaginationParams),
    responses((status = 200, description = "Transfers returned")),
    tag = "transfers"
)]
pub async fn list_transfers(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<TransferFilters>,
    Query(page): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (items, total) = state
        .services
        .transfers
        .list_transfers(filters.location_id, page.page, page.limit)
        .await?;
    Ok(ok_response(Paged::new(items, total, &page)))
}

async fn get_transfer(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let transfer = state.services.transfers.get_transfer(id).await?;
    Ok(ok_response(transfer))
}
