use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub from_location_id: Option<Uuid>,
    pub to_location_id: Option<Uuid>,
    pub trip_date: Date,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub distance_km: Option<Decimal>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicle::Entity",
        from = "Column::VehicleId",
        to = "super::vehicle::Column::Id"
    )]
    Vehicle,
    #[sea_orm(
        belongs_to = "super::driver::Entity",
        from = "Column::DriverId",
        to = "super::driver::Column::Id"
    )]
    Driver,
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl Related<super::driver::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Driver.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TripStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl TripStatus {
    /// Legal transitions: planned -> in_progress | cancelled,
    /// in_progress -> completed | cancelled. Terminal states have no exits.
    pub fn can_transition_to(self, next: TripStatus) -> bool {
        matches!(
            (self, next),
            (TripStatus::Planned, TripStatus::InProgress)
                | (TripStatus::Planned, TripStatus::Cancelled)
                | (TripStatus::InProgress, TripStatus::Completed)
                | (TripStatus::InProgress, TripStatus::Cancelled)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::TripStatus;

    #[test]
    fn terminal_states_have_no_exits() {
        for next in [
            TripStatus::Planned,
            TripStatus::InProgress,
            TripStatus::Completed,
            TripStatus::Cancelled,
        ] {
            assert!(!TripStatus::Completed.can_transition_to(next));
            assert!(!TripStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn planned_trip_can_start_or_cancel() {
        assert!(TripStatus::Planned.can_transition_to(TripStatus::InProgress));
        assert!(TripStatus::Planned.can_transition_to(TripStatus::Cancelled));
        assert!(!TripStatus::Planned.can_transition_to(TripStatus::Completed));
    }
}
