use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::IntCounter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    entities::{location, stock_transfer},
    errors::ServiceError,
    events::{Event, EventSender},
    services::inventory::{apply_adjustment, StockDirection},
};

lazy_static! {
    static ref STOCK_TRANSFERS: IntCounter = IntCounter::new(
        "stock_transfers_total",
        "Total number of completed stock transfers"
    )
    .expect("metric can be created");
    static ref STOCK_TRANSFER_FAILURES: IntCounter = IntCounter::new(
        "stock_transfer_failures_total",
        "Total number of failed stock transfers"
    )
    .expect("metric can be created");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferStockInput {
    pub from_location_id: Uuid,
    pub to_location_id: Uuid,
    pub material: String,
    pub quantity: Decimal,
    pub notes: Option<String>,
}

/// Moves stock between two locations and writes the transfer ledger row.
///
/// The debit, credit, and ledger insert run in one database transaction:
/// either all three land or none do, so the two inventory rows and the
/// ledger can never diverge.
#[derive(Clone)]
pub struct TransferService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl TransferService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(from = %input.from_location_id, to = %input.to_location_id))]
    pub async fn transfer_stock(
        &self,
        actor: Uuid,
        input: TransferStockInput,
    ) -> Result<stock_transfer::Model, ServiceError> {
        if input.quantity <= Decimal::ZERO {
            STOCK_TRANSFER_FAILURES.inc();
            return Err(ServiceError::ValidationError(
                "Transfer quantity must be positive".to_string(),
            ));
        }
        if input.from_location_id == input.to_location_id {
            STOCK_TRANSFER_FAILURES.inc();
            return Err(ServiceError::ValidationError(
                "Cannot transfer stock to the same location".to_string(),
            ));
        }

        let TransferStockInput {
            from_location_id,
            to_location_id,
            material,
            quantity,
            notes,
        } = input;

        let result = self
            .db
            .transaction::<_, stock_transfer::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    for id in [from_location_id, to_location_id] {
                        location::Entity::find_by_id(id)
                            .one(txn)
                            .await?
                            .ok_or_else(|| {
                                ServiceError::NotFound(format!("Location {} not found", id))
                            })?;
                    }

                    apply_adjustment(
                        txn,
                        from_location_id,
                        &material,
                        quantity,
                        StockDirection::Decrease,
                    )
                    .await?;

                    apply_adjustment(
                        txn,
                        to_location_id,
                        &material,
                        quantity,
                        StockDirection::Increase,
                    )
                    .await?;

                    let row = stock_transfer::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        from_location_id: Set(from_location_id),
                        to_location_id: Set(to_location_id),
                        material: Set(material.clone()),
                        quantity: Set(quantity),
                        notes: Set(notes),
                        transferred_by: Set(actor),
                        created_at: Set(Utc::now()),
                    };
                    Ok(row.insert(txn).await?)
                })
            })
            .await;

        let transfer = match result {
            Ok(transfer) => transfer,
            Err(e) => {
                STOCK_TRANSFER_FAILURES.inc();
                let err = match e {
                    TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
                    TransactionError::Transaction(service_err) => service_err,
                };
                error!("Stock transfer failed: {}", err);
                return Err(err);
            }
        };

        self.event_sender.send_best_effort(Event::StockTransferred {
            transfer_id: transfer.id,
            from_location_id: transfer.from_location_id,
            to_location_id: transfer.to_location_id,
            material: transfer.material.clone(),
            quantity: transfer.quantity,
        });

        info!(
            transfer_id = %transfer.id,
            material = %transfer.material,
            quantity = %transfer.quantity,
            "Stock transferred"
        );
        STOCK_TRANSFERS.inc();

        Ok(transfer)
    }

    /// Fetches a single transfer ledger row.
    #[instrument(skip(self))]
    pub async fn get_transfer(&self, id: Uuid) -> Result<stock_transfer::Model, ServiceError> {
        stock_transfer::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Transfer {} not found", id)))
    }

    /// Lists transfer ledger rows, newest first, optionally scoped to a
    /// location (either side of the transfer).
    #[instrument(skip(self))]
    pub async fn list_transfers(
        &self,
        location_id: Option<Uuid>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<stock_transfer::Model>, u64), ServiceError> {
        use sea_orm::{ColumnTrait, Condition, PaginatorTrait, QueryFilter, QueryOrder};

        let mut query = stock_transfer::Entity::find()
            .order_by_desc(stock_transfer::Column::CreatedAt);
        if let Some(location_id) = location_id {
            query = query.filter(
                Condition::any()
                    .add(stock_transfer::Column::FromLocationId.eq(location_id))
                    .add(stock_transfer::Column::ToLocationId.eq(location_id)),
            );
        }

        let paginator = query.paginate(&*self.db, limit.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }
}
