use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Buy/sell rate for a material, effective from a given date. The current
/// rate for a material is the row with the latest effective_from not after
/// today.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rate_cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub material: String,
    pub unit: String,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub buy_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub sell_rate: Decimal,
    pub effective_from: Date,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
