use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
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
    handlers::common::{
        created_response, no_content_response, ok_response, validate_input, Paged, PaginationParams,
    },
    services::expenses::RecordExpenseInput,
    AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordExpenseRequest {
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub location_id: Option<Uuid>,
    pub incurred_on: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseFilters {
    pub category: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(record_expense))
        .route("/:id", get(get_expense).delete(delete_expense))
}

async fn record_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RecordExpenseRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let expense = state
        .services
        .expenses
        .record_expense(
            user.user_id,
            RecordExpenseInput {
                category: payload.category,
                amount: payload.amount,
                description: payload.description,
                location_id: payload.location_id,
                incurred_on: payload.incurred_on,
            },
        )
        .await?;
    Ok(created_response(expense))
}

async fn list_expenses(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filters): Query<ExpenseFilters>,
    Query(page): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (items, total) = state
        .services
        .expenses
        .list_expenses(filters.category, filters.from, filters.to, page.page, page.limit)
        .await?;
    Ok(ok_response(Paged::new(items, total, &page)))
}

async fn get_expense(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let expense = state.services.expenses.get_expense(id).await?;
    Ok(ok_response(expense))
}

async fn delete_expense(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.expenses.delete_expense(id).await?;
    Ok(no_content_response())
}
