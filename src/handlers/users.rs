use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    auth::AuthUser,
    errors::ServiceError,
    handlers::common::{created_response, ok_response, validate_input},
    services::users::ProvisionUserInput,
    AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    #[schema(value_type = Object)]
    pub user: crate::entities::user::Model,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProvisionUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Full name cannot be empty"))]
    pub full_name: String,
    /// admin | manager | operator
    pub role: String,
}

/// Routes that require no bearer token.
pub fn public_user_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Routes behind authentication.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(provision_user))
        .route("/me", get(me))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let (token, user) = state
        .services
        .users
        .login(&payload.email, &payload.password)
        .await
        .map_err(|e| ServiceError::Unauthorized(e.to_string()))?;
    Ok(ok_response(LoginResponse { token, user }))
}

/// Provision a new account. Admin only; replaces the back-office
/// user-provisioning RPC.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = ProvisionUserRequest,
    responses(
        (status = 201, description = "User created"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn provision_user(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ProvisionUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let created = state
        .services
        .users
        .provision_user(
            &user,
            ProvisionUserInput {
                email: payload.email,
                password: payload.password,
                full_name: payload.full_name,
                role: payload.role,
            },
        )
        .await?;
    Ok(created_response(created))
}

async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let model = state.services.users.get_user(user.user_id).await?;
    Ok(ok_response(model))
}
