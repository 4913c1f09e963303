use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        inventory_level,
        location::{self, LocationType},
    },
    errors::ServiceError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLocationInput {
    pub name: String,
    pub location_type: String,
    pub district: String,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLocationInput {
    pub name: Option<String>,
    pub district: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
}

/// Reference data for godowns and collection points.
#[derive(Clone)]
pub struct LocationService {
    db: Arc<DatabaseConnection>,
}

impl LocationService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_location(
        &self,
        input: CreateLocationInput,
    ) -> Result<location::Model, ServiceError> {
        let location_type = LocationType::from_str(&input.location_type).map_err(|_| {
            ServiceError::ValidationError(format!(
                "Unknown location type '{}' (expected storage_facility or collection_point)",
                input.location_type
            ))
        })?;
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Location name cannot be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let row = location::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            location_type: Set(location_type.to_string()),
            district: Set(input.district),
            address: Set(input.address),
            contact_name: Set(input.contact_name),
            contact_phone: Set(input.contact_phone),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(row.insert(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_location(&self, id: Uuid) -> Result<location::Model, ServiceError> {
        location::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Location {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_locations(
        &self,
        location_type: Option<String>,
        district: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<location::Model>, u64), ServiceError> {
        let mut query = location::Entity::find().order_by_asc(location::Column::Name);
        if let Some(location_type) = location_type {
            query = query.filter(location::Column::LocationType.eq(location_type));
        }
        if let Some(district) = district {
            query = query.filter(location::Column::District.eq(district));
        }

        let paginator = query.paginate(&*self.db, limit.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_location(
        &self,
        id: Uuid,
        input: UpdateLocationInput,
    ) -> Result<location::Model, ServiceError> {
        let existing = self.get_location(id).await?;
        let mut active: location::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(district) = input.district {
            active.district = Set(district);
        }
        if input.address.is_some() {
            active.address = Set(input.address);
        }
        if input.contact_name.is_some() {
            active.contact_name = Set(input.contact_name);
        }
        if input.contact_phone.is_some() {
            active.contact_phone = Set(input.contact_phone);
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?)
    }

    /// Deletes a location. Refused while any material remains on hand there.
    #[instrument(skip(self))]
    pub async fn delete_location(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_location(id).await?;

        let on_hand = inventory_level::Entity::find()
            .filter(inventory_level::Column::LocationId.eq(id))
            .filter(inventory_level::Column::Quantity.gt(Decimal::ZERO))
            .count(&*self.db)
            .await?;
        if on_hand > 0 {
            return Err(ServiceError::Conflict(format!(
                "Location {} still holds inventory; transfer or sell it first",
                id
            )));
        }

        existing.delete(&*self.db).await?;
        Ok(())
    }
}
