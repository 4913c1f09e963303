use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        driver::{self, DriverStatus},
        trip::{self, TripStatus},
        vehicle::{self, VehicleStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicleInput {
    pub registration_no: String,
    pub vehicle_type: String,
    pub capacity_kg: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDriverInput {
    pub name: String,
    pub phone: Option<String>,
    pub license_no: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTripInput {
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub from_location_id: Option<Uuid>,
    pub to_location_id: Option<Uuid>,
    pub trip_date: NaiveDate,
    pub distance_km: Option<Decimal>,
    pub notes: Option<String>,
}

/// Vehicles, drivers, and trips.
#[derive(Clone)]
pub struct FleetService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl FleetService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    // Vehicles

    #[instrument(skip(self, input), fields(registration = %input.registration_no))]
    pub async fn create_vehicle(
        &self,
        input: CreateVehicleInput,
    ) -> Result<vehicle::Model, ServiceError> {
        let registration_no = input.registration_no.trim().to_uppercase();
        if registration_no.is_empty() {
            return Err(ServiceError::ValidationError(
                "Registration number cannot be empty".to_string(),
            ));
        }
        let duplicate = vehicle::Entity::find()
            .filter(vehicle::Column::RegistrationNo.eq(registration_no.clone()))
            .one(&*self.db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Vehicle with registration {} already exists",
                registration_no
            )));
        }

        let now = Utc::now();
        let row = vehicle::ActiveModel {
            id: Set(Uuid::new_v4()),
            registration_no: Set(registration_no),
            vehicle_type: Set(input.vehicle_type),
            capacity_kg: Set(input.capacity_kg),
            status: Set(VehicleStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(row.insert(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_vehicle(&self, id: Uuid) -> Result<vehicle::Model, ServiceError> {
        vehicle::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Vehicle {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_vehicles(
        &self,
        status: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<vehicle::Model>, u64), ServiceError> {
        let mut query = vehicle::Entity::find().order_by_asc(vehicle::Column::RegistrationNo);
        if let Some(status) = status {
            query = query.filter(vehicle::Column::Status.eq(status));
        }
        let paginator = query.paginate(&*self.db, limit.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn set_vehicle_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<vehicle::Model, ServiceError> {
        let status = VehicleStatus::from_str(status).map_err(|_| {
            ServiceError::ValidationError(format!(
                "Unknown vehicle status '{}' (expected active, maintenance, or retired)",
                status
            ))
        })?;
        let existing = self.get_vehicle(id).await?;
        let mut active: vehicle::ActiveModel = existing.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?)
    }

    // Drivers

    #[instrument(skip(self, input), fields(license = %input.license_no))]
    pub async fn create_driver(
        &self,
        input: CreateDriverInput,
    ) -> Result<driver::Model, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Driver name cannot be empty".to_string(),
            ));
        }
        let duplicate = driver::Entity::find()
            .filter(driver::Column::LicenseNo.eq(input.license_no.clone()))
            .one(&*self.db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Driver with license {} already exists",
                input.license_no
            )));
        }

        let now = Utc::now();
        let row = driver::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            phone: Set(input.phone),
            license_no: Set(input.license_no),
            status: Set(DriverStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(row.insert(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_driver(&self, id: Uuid) -> Result<driver::Model, ServiceError> {
        driver::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Driver {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_drivers(
        &self,
        status: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<driver::Model>, u64), ServiceError> {
        let mut query = driver::Entity::find().order_by_asc(driver::Column::Name);
        if let Some(status) = status {
            query = query.filter(driver::Column::Status.eq(status));
        }
        let paginator = query.paginate(&*self.db, limit.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn set_driver_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<driver::Model, ServiceError> {
        let status = DriverStatus::from_str(status).map_err(|_| {
            ServiceError::ValidationError(format!(
                "Unknown driver status '{}' (expected active or inactive)",
                status
            ))
        })?;
        let existing = self.get_driver(id).await?;
        let mut active: driver::ActiveModel = existing.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?)
    }

    // Trips

    /// Creates a trip in `planned` state. Vehicle and driver must exist and
    /// be active.
    #[instrument(skip(self, input), fields(vehicle = %input.vehicle_id, driver = %input.driver_id))]
    pub async fn create_trip(&self, input: CreateTripInput) -> Result<trip::Model, ServiceError> {
        let vehicle = self.get_vehicle(input.vehicle_id).await?;
        if vehicle.status != VehicleStatus::Active.to_string() {
            return Err(ServiceError::InvalidStatus(format!(
                "Vehicle {} is {}, not active",
                vehicle.registration_no, vehicle.status
            )));
        }
        let driver = self.get_driver(input.driver_id).await?;
        if driver.status != DriverStatus::Active.to_string() {
            return Err(ServiceError::InvalidStatus(format!(
                "Driver {} is {}, not active",
                driver.name, driver.status
            )));
        }

        let now = Utc::now();
        let row = trip::ActiveModel {
            id: Set(Uuid::new_v4()),
            vehicle_id: Set(input.vehicle_id),
            driver_id: Set(input.driver_id),
            from_location_id: Set(input.from_location_id),
            to_location_id: Set(input.to_location_id),
            trip_date: Set(input.trip_date),
            distance_km: Set(input.distance_km),
            status: Set(TripStatus::Planned.to_string()),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(row.insert(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_trip(&self, id: Uuid) -> Result<trip::Model, ServiceError> {
        trip::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Trip {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_trips(
        &self,
        vehicle_id: Option<Uuid>,
        driver_id: Option<Uuid>,
        status: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<trip::Model>, u64), ServiceError> {
        let mut query = trip::Entity::find().order_by_desc(trip::Column::TripDate);
        if let Some(vehicle_id) = vehicle_id {
            query = query.filter(trip::Column::VehicleId.eq(vehicle_id));
        }
        if let Some(driver_id) = driver_id {
            query = query.filter(trip::Column::DriverId.eq(driver_id));
        }
        if let Some(status) = status {
            query = query.filter(trip::Column::Status.eq(status));
        }
        let paginator = query.paginate(&*self.db, limit.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    /// Moves a trip along its lifecycle, rejecting illegal transitions.
    #[instrument(skip(self))]
    pub async fn transition_trip(
        &self,
        id: Uuid,
        next_status: &str,
    ) -> Result<trip::Model, ServiceError> {
        let next = TripStatus::from_str(next_status).map_err(|_| {
            ServiceError::ValidationError(format!("Unknown trip status '{}'", next_status))
        })?;

        let existing = self.get_trip(id).await?;
        let current = TripStatus::from_str(&existing.status)
            .map_err(|_| ServiceError::InternalError(format!(
                "Trip {} has corrupt status '{}'",
                id, existing.status
            )))?;

        if !current.can_transition_to(next) {
            return Err(ServiceError::InvalidStatus(format!(
                "Trip cannot move from {} to {}",
                current, next
            )));
        }

        let old_status = existing.status.clone();
        let mut active: trip::ActiveModel = existing.into();
        active.status = Set(next.to_string());
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db).await?;

        self.event_sender.send_best_effort(Event::TripStatusChanged {
            trip_id: updated.id,
            old_status,
            new_status: updated.status.clone(),
        });

        Ok(updated)
    }
}
