use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::IntCounter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    entities::{
        collection,
        location::{self, LocationType},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::inventory::{apply_adjustment, StockDirection},
};

lazy_static! {
    static ref COLLECTIONS_RECORDED: IntCounter = IntCounter::new(
        "collections_recorded_total",
        "Total number of recorded material collections"
    )
    .expect("metric can be created");
    static ref COLLECTION_FAILURES: IntCounter = IntCounter::new(
        "collection_failures_total",
        "Total number of failed collection recordings"
    )
    .expect("metric can be created");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordCollectionInput {
    pub location_id: Uuid,
    pub material: String,
    pub quantity: Decimal,
    pub unit: String,
    pub amount_paid: Decimal,
    pub notes: Option<String>,
}

/// Outcome of recording a collection: the ledger row plus the location the
/// stock was actually credited to.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedCollection {
    pub collection: collection::Model,
    pub stocked_at: Uuid,
}

/// Records material collections and credits the received stock.
///
/// Ledger insert and stock credit share one transaction, so the collection
/// fact and the inventory projection cannot diverge.
#[derive(Clone)]
pub struct CollectionService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl CollectionService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(location = %input.location_id, material = %input.material))]
    pub async fn record_collection(
        &self,
        actor: Uuid,
        input: RecordCollectionInput,
    ) -> Result<RecordedCollection, ServiceError> {
        if input.quantity <= Decimal::ZERO {
            COLLECTION_FAILURES.inc();
            return Err(ServiceError::ValidationError(
                "Collection quantity must be positive".to_string(),
            ));
        }
        if input.amount_paid < Decimal::ZERO {
            COLLECTION_FAILURES.inc();
            return Err(ServiceError::ValidationError(
                "Amount paid cannot be negative".to_string(),
            ));
        }

        let RecordCollectionInput {
            location_id,
            material,
            quantity,
            unit,
            amount_paid,
            notes,
        } = input;

        let result = self
            .db
            .transaction::<_, RecordedCollection, ServiceError>(move |txn| {
                Box::pin(async move {
                    let site = location::Entity::find_by_id(location_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Location {} not found", location_id))
                        })?;

                    let row = collection::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        location_id: Set(location_id),
                        material: Set(material.clone()),
                        quantity: Set(quantity),
                        unit: Set(unit),
                        amount_paid: Set(amount_paid),
                        notes: Set(notes),
                        collected_by: Set(actor),
                        created_at: Set(Utc::now()),
                    };
                    let inserted = row.insert(txn).await?;

                    let stocked_at = resolve_storage_location(txn, &site).await?;
                    apply_adjustment(txn, stocked_at, &material, quantity, StockDirection::Increase)
                        .await?;

                    Ok(RecordedCollection {
                        collection: inserted,
                        stocked_at,
                    })
                })
            })
            .await;

        let recorded = match result {
            Ok(recorded) => recorded,
            Err(e) => {
                COLLECTION_FAILURES.inc();
                let err = match e {
                    TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
                    TransactionError::Transaction(service_err) => service_err,
                };
                error!("Failed to record collection: {}", err);
                return Err(err);
            }
        };

        self.event_sender.send_best_effort(Event::CollectionRecorded {
            collection_id: recorded.collection.id,
            location_id: recorded.collection.location_id,
            stocked_at: recorded.stocked_at,
            material: recorded.collection.material.clone(),
            quantity: recorded.collection.quantity,
        });

        info!(
            collection_id = %recorded.collection.id,
            stocked_at = %recorded.stocked_at,
            "Collection recorded"
        );
        COLLECTIONS_RECORDED.inc();

        Ok(recorded)
    }

    /// Fetches a single collection ledger row.
    #[instrument(skip(self))]
    pub async fn get_collection(&self, id: Uuid) -> Result<collection::Model, ServiceError> {
        collection::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Collection {} not found", id)))
    }

    /// Lists collection ledger rows, newest first.
    #[instrument(skip(self))]
    pub async fn list_collections(
        &self,
        location_id: Option<Uuid>,
        material: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<collection::Model>, u64), ServiceError> {
        let mut query =
            collection::Entity::find().order_by_desc(collection::Column::CreatedAt);
        if let Some(location_id) = location_id {
            query = query.filter(collection::Column::LocationId.eq(location_id));
        }
        if let Some(material) = material {
            query = query.filter(collection::Column::Material.eq(material));
        }

        let paginator = query.paginate(&*self.db, limit.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }
}

/// Picks the location whose inventory a collection credits.
///
/// A storage facility credits itself. A collection point credits the first
/// storage facility returned by an unordered lookup — longstanding routing
/// behavior that downstream reporting depends on; do not change without
/// sign-off from the operations team.
async fn resolve_storage_location<C: ConnectionTrait>(
    conn: &C,
    site: &location::Model,
) -> Result<Uuid, ServiceError> {
    if site.is_storage_facility() {
        return Ok(site.id);
    }

    let facility = location::Entity::find()
        .filter(location::Column::LocationType.eq(LocationType::StorageFacility.to_string()))
        .one(conn)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(
                "No storage facility configured to receive collected stock".to_string(),
            )
        })?;
    Ok(facility.id)
}
