//! Authentication and authorization.
//!
//! JWT bearer tokens with argon2 password hashing. The `AuthUser` extractor
//! rejects unauthenticated requests before a handler runs, so service-layer
//! code always receives a proven actor identity.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::entities::user::Role;

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated actor extracted from a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub token_id: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: String,
    token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: String, token_expiration: Duration) -> Result<Self, AuthError> {
        if jwt_secret.len() < 32 {
            return Err(AuthError::InternalError(
                "JWT secret must be at least 32 characters".to_string(),
            ));
        }
        Ok(Self {
            jwt_secret,
            token_expiration,
        })
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication credentials")]
    MissingAuth,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Internal auth error: {0}")]
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::MissingAuth => (StatusCode::UNAUTHORIZED, "AUTH_MISSING"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "AUTH_INVALID_TOKEN"),
            AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "AUTH_EXPIRED_TOKEN"),
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "AUTH_INVALID_CREDENTIALS"),
            AuthError::AccountDisabled => (StatusCode::FORBIDDEN, "AUTH_ACCOUNT_DISABLED"),
            AuthError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_INTERNAL_ERROR")
            }
        };
        let body = Json(serde_json::json!({
            "error": { "code": code, "message": self.to_string() }
        }));
        (status, body).into_response()
    }
}

/// Issues and validates tokens, hashes and verifies passwords.
pub struct AuthService {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates a signed access token for a user.
    pub fn generate_token(
        &self,
        user: &crate::entities::user::Model,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.full_name.clone(),
            role: user.role.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::from_std(self.config.token_expiration).unwrap_or_else(|_| chrono::Duration::seconds(3600))).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(format!("Failed to sign token: {}", e)))
    }

    /// Validates a token and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => {
                    debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            })
    }

    /// Hashes a password with argon2 and a fresh salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::InternalError(format!("Failed to hash password: {}", e)))
    }

    /// Verifies a password against a stored argon2 hash.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AuthError::InternalError(format!("Malformed password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    fn auth_user_from_claims(&self, claims: Claims) -> Result<AuthUser, AuthError> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let role = Role::from_str(&claims.role).map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthUser {
            user_id,
            email: claims.email,
            name: claims.name,
            role,
            token_id: claims.jti,
        })
    }
}

/// State types that can hand out the auth service implement this so the
/// `AuthUser` extractor works against them.
pub trait AuthServiceProvider {
    fn auth_service(&self) -> &Arc<AuthService>;
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: AuthServiceProvider + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_service = state.auth_service();

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingAuth)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AuthError::MissingAuth)?;

        let claims = auth_service.validate_token(token)?;
        auth_service.auth_user_from_claims(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn service() -> AuthService {
        let cfg = AuthConfig::new(
            "test_secret_key_for_testing_purposes_only_32chars_minimum_ok".to_string(),
            Duration::from_secs(3600),
        )
        .unwrap();
        AuthService::new(cfg)
    }

    fn sample_user() -> crate::entities::user::Model {
        crate::entities::user::Model {
            id: Uuid::new_v4(),
            email: "ops@example.com".to_string(),
            password_hash: String::new(),
            full_name: "Ops User".to_string(),
            role: Role::Operator.to_string(),
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn round_trips_a_token() {
        let svc = service();
        let user = sample_user();
        let token = svc.generate_token(&user).unwrap();
        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role, "operator");
    }

    #[test]
    fn rejects_a_tampered_token() {
        let svc = service();
        let token = svc.generate_token(&sample_user()).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(svc.validate_token(&tampered).is_err());
    }

    #[test]
    fn verifies_hashed_passwords() {
        let svc = service();
        let hash = svc.hash_password("correct horse").unwrap();
        assert!(svc.verify_password("correct horse", &hash).unwrap());
        assert!(!svc.verify_password("wrong horse", &hash).unwrap());
    }
}
