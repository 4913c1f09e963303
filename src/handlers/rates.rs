use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    auth::AuthUser,
    errors::ServiceError,
    handlers::common::{created_response, ok_response, validate_input, Paged, PaginationParams},
    services::rates::CreateRateCardInput,
    AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRateCardRequest {
    #[validate(length(min = 1, message = "Material cannot be empty"))]
    pub material: String,
    #[validate(length(min = 1, message = "Unit cannot be empty"))]
    pub unit: String,
    pub buy_rate: Decimal,
    pub sell_rate: Decimal,
    pub effective_from: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct RateCardFilters {
    pub material: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentRateQuery {
    pub on: Option<NaiveDate>,
}

pub fn rate_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rate_cards).post(create_rate_card))
        .route("/current/:material", get(current_rate))
}

async fn create_rate_card(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateRateCardRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let card = state
        .services
        .rates
        .create_rate_card(CreateRateCardInput {
            material: payload.material,
            unit: payload.unit,
            buy_rate: payload.buy_rate,
            sell_rate: payload.sell_rate,
            effective_from: payload.effective_from,
        })
        .await?;
    Ok(created_response(card))
}

async fn list_rate_cards(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<RateCardFilters>,
    Query(page): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (items, total) = state
        .services
        .rates
        .list_rate_cards(filters.material, page.page, page.limit)
        .await?;
    Ok(ok_response(Paged::new(items, total, &page)))
}

/// The rate in force for a material on a date (defaults to today).
async fn current_rate(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(material): Path<String>,
    Query(query): Query<CurrentRateQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let on = query.on.unwrap_or_else(|| Utc::now().date_naive());
    let card = state.services.rates.current_rate(&material, on).await?;
    Ok(ok_response(card))
}
