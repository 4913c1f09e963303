use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::inventory_level::{self, Entity as InventoryLevels},
    errors::ServiceError,
};

/// Direction of a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    Increase,
    Decrease,
}

/// Adjusts the on-hand quantity for a (location, material) pair.
///
/// Generic over `ConnectionTrait` so callers can compose it into their own
/// transactions; the multi-step ledger operations (collections, sales,
/// transfers) all run it against their transaction handle. One read, at most
/// one write. A decrement that would drive the quantity negative fails with
/// `InsufficientStock` before anything is written; an increment creates the
/// projection row lazily if none exists.
pub async fn apply_adjustment<C: ConnectionTrait>(
    conn: &C,
    location_id: Uuid,
    material: &str,
    quantity: Decimal,
    direction: StockDirection,
) -> Result<inventory_level::Model, ServiceError> {
    if quantity <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Adjustment quantity must be positive".to_string(),
        ));
    }

    let existing = InventoryLevels::find()
        .filter(inventory_level::Column::LocationId.eq(location_id))
        .filter(inventory_level::Column::Material.eq(material))
        .one(conn)
        .await?;

    match (existing, direction) {
        (None, StockDirection::Decrease) => Err(ServiceError::InsufficientStock(format!(
            "No stock of {} at location {}",
            material, location_id
        ))),
        (Some(level), StockDirection::Decrease) => {
            if level.quantity < quantity {
                return Err(ServiceError::InsufficientStock(format!(
                    "Requested {} of {} but only {} on hand at location {}",
                    quantity, material, level.quantity, location_id
                )));
            }
            let new_quantity = level.quantity - quantity;
            let mut active: inventory_level::ActiveModel = level.into();
            active.quantity = Set(new_quantity);
            active.last_updated = Set(Utc::now());
            Ok(active.update(conn).await?)
        }
        (Some(level), StockDirection::Increase) => {
            let new_quantity = level.quantity + quantity;
            let mut active: inventory_level::ActiveModel = level.into();
            active.quantity = Set(new_quantity);
            active.last_updated = Set(Utc::now());
            Ok(active.update(conn).await?)
        }
        (None, StockDirection::Increase) => {
            let row = inventory_level::ActiveModel {
                id: Set(Uuid::new_v4()),
                location_id: Set(location_id),
                material: Set(material.to_string()),
                quantity: Set(quantity),
                last_updated: Set(Utc::now()),
            };
            Ok(row.insert(conn).await?)
        }
    }
}

/// Read side of the inventory projection, plus a direct adjustment entry
/// point for corrections.
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
}

impl InventoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Gets the inventory level for a material at a location, if one exists.
    #[instrument(skip(self))]
    pub async fn get_level(
        &self,
        location_id: Uuid,
        material: &str,
    ) -> Result<Option<inventory_level::Model>, ServiceError> {
        let level = InventoryLevels::find()
            .filter(inventory_level::Column::LocationId.eq(location_id))
            .filter(inventory_level::Column::Material.eq(material))
            .one(&*self.db)
            .await?;
        Ok(level)
    }

    /// Lists inventory levels with optional filters, paginated.
    #[instrument(skip(self))]
    pub async fn list_levels(
        &self,
        location_id: Option<Uuid>,
        material: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<inventory_level::Model>, u64), ServiceError> {
        let mut query = InventoryLevels::find();
        if let Some(location_id) = location_id {
            query = query.filter(inventory_level::Column::LocationId.eq(location_id));
        }
        if let Some(material) = material {
            query = query.filter(inventory_level::Column::Material.eq(material));
        }

        let paginator = query.paginate(&*self.db, limit.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Direct stock correction outside of any ledger operation.
    #[instrument(skip(self))]
    pub async fn adjust(
        &self,
        location_id: Uuid,
        material: &str,
        quantity: Decimal,
        direction: StockDirection,
    ) -> Result<inventory_level::Model, ServiceError> {
        apply_adjustment(&*self.db, location_id, material, quantity, direction).await
    }
}
