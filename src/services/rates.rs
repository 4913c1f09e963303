use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{entities::rate_card, errors::ServiceError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRateCardInput {
    pub material: String,
    pub unit: String,
    pub buy_rate: Decimal,
    pub sell_rate: Decimal,
    pub effective_from: NaiveDate,
}

/// Buy/sell rates per material, versioned by effective date.
#[derive(Clone)]
pub struct RateCardService {
    db: Arc<DatabaseConnection>,
}

impl RateCardService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(material = %input.material))]
    pub async fn create_rate_card(
        &self,
        input: CreateRateCardInput,
    ) -> Result<rate_card::Model, ServiceError> {
        if input.buy_rate < Decimal::ZERO || input.sell_rate < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Rates cannot be negative".to_string(),
            ));
        }
        if input.material.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Material cannot be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let row = rate_card::ActiveModel {
            id: Set(Uuid::new_v4()),
            material: Set(input.material),
            unit: Set(input.unit),
            buy_rate: Set(input.buy_rate),
            sell_rate: Set(input.sell_rate),
            effective_from: Set(input.effective_from),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(row.insert(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_rate_cards(
        &self,
        material: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<rate_card::Model>, u64), ServiceError> {
        let mut query = rate_card::Entity::find()
            .order_by_asc(rate_card::Column::Material)
            .order_by_desc(rate_card::Column::EffectiveFrom);
        if let Some(material) = material {
            query = query.filter(rate_card::Column::Material.eq(material));
        }
        let paginator = query.paginate(&*self.db, limit.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// The rate in force for a material on a given date: the row with the
    /// latest effective_from not after that date.
    #[instrument(skip(self))]
    pub async fn current_rate(
        &self,
        material: &str,
        on: NaiveDate,
    ) -> Result<rate_card::Model, ServiceError> {
        rate_card::Entity::find()
            .filter(rate_card::Column::Material.eq(material))
            .filter(rate_card::Column::EffectiveFrom.lte(on))
            .order_by_desc(rate_card::Column::EffectiveFrom)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("No rate card for {} in force on {}", material, on))
            })
    }
}
