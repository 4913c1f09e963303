use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    errors::ServiceError,
    handlers::common::{ok_response, Paged, PaginationParams},
    services::inventory::StockDirection,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct InventoryFilters {
    pub location_id: Option<Uuid>,
    pub material: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustInventoryRequest {
    pub location_id: Uuid,
    pub material: String,
    pub quantity: Decimal,
    /// "increase" or "decrease"
    pub direction: String,
}

pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventory))
        .route("/adjust", post(adjust_inventory))
        .route("/:location_id/:material", get(get_level))
}

/// List inventory levels, optionally filtered by location and material.
#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    params(PaginationParams),
    responses(
        (status = 200, description = "Inventory levels returned"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_inventory(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<InventoryFilters>,
    Query(page): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (items, total) = state
        .services
        .inventory
        .list_levels(filters.location_id, filters.material, page.page, page.limit)
        .await?;
    Ok(ok_response(Paged::new(items, total, &page)))
}

/// Current on-hand quantity for a material at a location. A missing
/// projection row reads as zero.
#[utoipa::path(
    get,
    path = "/api/v1/inventory/{location_id}/{material}",
    responses(
        (status = 200, description = "Inventory level returned"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_level(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((location_id, material)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ServiceError> {
    let level = state
        .services
        .inventory
        .get_level(location_id, &material)
        .await?;
    let quantity = level
        .as_ref()
        .map(|l| l.quantity)
        .unwrap_or(Decimal::ZERO);
    Ok(ok_response(serde_json::json!({
        "location_id": location_id,
        "material": material,
        "quantity": quantity,
        "last_updated": level.map(|l| l.last_updated),
    })))
}

/// Direct stock correction, outside any ledger operation. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/inventory/adjust",
    request_body = AdjustInventoryRequest,
    responses(
        (status = 200, description = "Inventory adjusted"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn adjust_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AdjustInventoryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    if !user.is_admin() {
        return Err(ServiceError::Forbidden(
            "Only admins can adjust inventory directly".to_string(),
        ));
    }
    let direction = match payload.direction.as_str() {
        "increase" => StockDirection::Increase,
        "decrease" => StockDirection::Decrease,
        other => {
            return Err(ServiceError::ValidationError(format!(
                "Unknown direction '{}' (expected increase or decrease)",
                other
            )))
        }
    };
    let level = state
        .services
        .inventory
        .adjust(payload.location_id, &payload.material, payload.quantity, direction)
        .await?;
    Ok(ok_response(level))
}
