use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::{AuthError, AuthService, AuthUser},
    entities::user::{self, Role},
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionUserInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
}

/// Account provisioning and credential checks. Provisioning is admin-only,
/// mirroring the back-office flow where managers create operator accounts.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    auth: Arc<AuthService>,
    event_sender: EventSender,
}

impl UserService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        auth: Arc<AuthService>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            db,
            auth,
            event_sender,
        }
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn provision_user(
        &self,
        actor: &AuthUser,
        input: ProvisionUserInput,
    ) -> Result<user::Model, ServiceError> {
        if !actor.is_admin() {
            return Err(ServiceError::Forbidden(
                "Only admins can provision users".to_string(),
            ));
        }
        let role = Role::from_str(&input.role).map_err(|_| {
            ServiceError::ValidationError(format!(
                "Unknown role '{}' (expected admin, manager, or operator)",
                input.role
            ))
        })?;
        if input.password.len() < 8 {
            return Err(ServiceError::ValidationError(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let email = input.email.trim().to_lowercase();
        let duplicate = user::Entity::find()
            .filter(user::Column::Email.eq(email.clone()))
            .one(&*self.db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "User with email {} already exists",
                email
            )));
        }

        let password_hash = self
            .auth
            .hash_password(&input.password)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;

        let row = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(password_hash),
            full_name: Set(input.full_name),
            role: Set(role.to_string()),
            active: Set(true),
            created_at: Set(Utc::now()),
        };
        let created = row.insert(&*self.db).await?;

        self.event_sender.send_best_effort(Event::UserProvisioned {
            user_id: created.id,
            role: created.role.clone(),
        });

        Ok(created)
    }

    /// Checks credentials and returns a signed access token with the user.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, user::Model), AuthError> {
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.active {
            return Err(AuthError::AccountDisabled);
        }
        if !self.auth.verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.auth.generate_token(&user)?;
        Ok((token, user))
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> Result<user::Model, ServiceError> {
        user::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))
    }

    /// Creates the first admin account if the users table is empty. Intended
    /// for bootstrap; a no-op once any user exists.
    #[instrument(skip(self, password))]
    pub async fn bootstrap_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<user::Model>, ServiceError> {
        use sea_orm::PaginatorTrait;

        let existing = user::Entity::find().count(&*self.db).await?;
        if existing > 0 {
            return Ok(None);
        }

        let password_hash = self
            .auth
            .hash_password(password)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        let row = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.trim().to_lowercase()),
            password_hash: Set(password_hash),
            full_name: Set("Administrator".to_string()),
            role: Set(Role::Admin.to_string()),
            active: Set(true),
            created_at: Set(Utc::now()),
        };
        Ok(Some(row.insert(&*self.db).await?))
    }
}
