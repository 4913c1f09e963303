pub mod collections;
pub mod common;
pub mod expenses;
pub mod fleet;
pub mod inventory;
pub mod locations;
pub mod rates;
pub mod sales;
pub mod transfers;
pub mod users;

use std::sync::Arc;

use crate::{auth::AuthService, db::DbPool, events::EventSender};

/// Services layer container handed to HTTP handlers through `AppState`.
#[derive(Clone)]
pub struct AppServices {
    pub locations: Arc<crate::services::locations::LocationService>,
    pub inventory: Arc<crate::services::inventory::InventoryService>,
    pub collections: Arc<crate::services::collections::CollectionService>,
    pub sales: Arc<crate::services::sales::SaleService>,
    pub transfers: Arc<crate::services::transfers::TransferService>,
    pub expenses: Arc<crate::services::expenses::ExpenseService>,
    pub fleet: Arc<crate::services::fleet::FleetService>,
    pub rates: Arc<crate::services::rates::RateCardService>,
    pub users: Arc<crate::services::users::UserService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender, auth: Arc<AuthService>) -> Self {
        Self {
            locations: Arc::new(crate::services::locations::LocationService::new(db.clone())),
            inventory: Arc::new(crate::services::inventory::InventoryService::new(db.clone())),
            collections: Arc::new(crate::services::collections::CollectionService::new(
                db.clone(),
                event_sender.clone(),
            )),
            sales: Arc::new(crate::services::sales::SaleService::new(
                db.clone(),
                event_sender.clone(),
            )),
            transfers: Arc::new(crate::services::transfers::TransferService::new(
                db.clone(),
                event_sender.clone(),
            )),
            expenses: Arc::new(crate::services::expenses::ExpenseService::new(
                db.clone(),
                event_sender.clone(),
            )),
            fleet: Arc::new(crate::services::fleet::FleetService::new(
                db.clone(),
                event_sender.clone(),
            )),
            rates: Arc::new(crate::services::rates::RateCardService::new(db.clone())),
            users: Arc::new(crate::services::users::UserService::new(
                db,
                auth,
                event_sender,
            )),
        }
    }
}
