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
    services::sales::RecordSaleInput,
    AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordSaleRequest {
    pub location_id: Uuid,
    #[validate(length(min = 1, message = "Buyer name cannot be empty"))]
    pub buyer_name: String,
    #[validate(length(min = 1, message = "Material cannot be empty"))]
    pub material: String,
    pub quantity: Decimal,
    #[validate(length(min = 1, message = "Unit cannot be empty"))]
    pub unit: String,
    pub sale_amount: Decimal,
    /// paid | pending | payment_required
    pub payment_status: String,
    #[serde(default)]
    pub amount_due: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaleFilters {
    pub location_id: Option<Uuid>,
    pub payment_status: Option<String>,
}

pub fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales).post(record_sale))
        .route("/:id", get(get_sale))
}

/// Record a sale: the stock debit and the ledger row commit together. Fails
/// with 422 when the location lacks sufficient stock.
#[utoipa::path(
    post,
    path = "/api/v1/sales",
    request_body = RecordSaleRequest,
    responses(
        (status = 201, description = "Sale recorded"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse)
    ),
    tag = "sales"
)]
pub async fn record_sale(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RecordSaleRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let sale = state
        .services
        .sales
        .record_sale(
            user.user_id,
            RecordSaleInput {
                location_id: payload.location_id,
                buyer_name: payload.buyer_name,
                material: payload.material,
                quantity: payload.quantity,
                unit: payload.unit,
                sale_amount: payload.sale_amount,
                payment_status: payload.payment_status,
                amount_due: payload.amount_due,
                notes: payload.notes,
            },
        )
        .await?;
    Ok(created_response(sale))
}

#[utoipa::path(
    get,
    path = "/api/v1/sales",
    params(PaginationParams),
    responses((status = 200, description = "Sales returned")),
    tag = "sales"
)]
pub async fn list_sales(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<SaleFilters>,
    Query(page): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (items, total) = state
        .services
        .sales
        .list_sales(
            filters.location_id,
            filters.payment_status,
            page.page,
            page.limit,
        )
        .await?;
    Ok(ok_response(Paged::new(items, total, &page)))
}

async fn get_sale(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let sale = state.services.sales.get_sale(id).await?;
    Ok(ok_response(sale))
}
