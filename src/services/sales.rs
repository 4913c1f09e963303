use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::IntCounter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    entities::{
        location,
        sale::{self, PaymentStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::inventory::{apply_adjustment, StockDirection},
};

lazy_static! {
    static ref SALES_RECORDED: IntCounter = IntCounter::new(
        "sales_recorded_total",
        "Total number of recorded sales"
    )
    .expect("metric can be created");
    static ref SALE_FAILURES: IntCounter = IntCounter::new(
        "sale_failures_total",
        "Total number of failed sale recordings"
    )
    .expect("metric can be created");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSaleInput {
    pub location_id: Uuid,
    pub buyer_name: String,
    pub material: String,
    pub quantity: Decimal,
    pub unit: String,
    pub sale_amount: Decimal,
    pub payment_status: String,
    pub amount_due: Decimal,
    pub notes: Option<String>,
}

/// Records sales: stock debit and ledger insert in one transaction.
///
/// The sale_amount / amount_due / payment_status relationship is stored as
/// supplied; the enum is validated but the arithmetic is the caller's.
#[derive(Clone)]
pub struct SaleService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl SaleService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(location = %input.location_id, material = %input.material))]
    pub async fn record_sale(
        &self,
        actor: Uuid,
        input: RecordSaleInput,
    ) -> Result<sale::Model, ServiceError> {
        if input.quantity <= Decimal::ZERO {
            SALE_FAILURES.inc();
            return Err(ServiceError::ValidationError(
                "Sale quantity must be positive".to_string(),
            ));
        }
        let payment_status = PaymentStatus::from_str(&input.payment_status).map_err(|_| {
            SALE_FAILURES.inc();
            ServiceError::ValidationError(format!(
                "Unknown payment status '{}' (expected paid, pending, or payment_required)",
                input.payment_status
            ))
        })?;

        let RecordSaleInput {
            location_id,
            buyer_name,
            material,
            quantity,
            unit,
            sale_amount,
            amount_due,
            notes,
            ..
        } = input;

        let result = self
            .db
            .transaction::<_, sale::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    location::Entity::find_by_id(location_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Location {} not found", location_id))
                        })?;

                    apply_adjustment(txn, location_id, &material, quantity, StockDirection::Decrease)
                        .await?;

                    let row = sale::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        location_id: Set(location_id),
                        buyer_name: Set(buyer_name),
                        material: Set(material.clone()),
                        quantity: Set(quantity),
                        unit: Set(unit),
                        sale_amount: Set(sale_amount),
                        payment_status: Set(payment_status.to_string()),
                        amount_due: Set(amount_due),
                        notes: Set(notes),
                        recorded_by: Set(actor),
                        created_at: Set(Utc::now()),
                    };
                    Ok(row.insert(txn).await?)
                })
            })
            .await;

        let recorded = match result {
            Ok(recorded) => recorded,
            Err(e) => {
                SALE_FAILURES.inc();
                let err = match e {
                    TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
                    TransactionError::Transaction(service_err) => service_err,
                };
                error!("Failed to record sale: {}", err);
                return Err(err);
            }
        };

        self.event_sender.send_best_effort(Event::SaleRecorded {
            sale_id: recorded.id,
            location_id: recorded.location_id,
            material: recorded.material.clone(),
            quantity: recorded.quantity,
            payment_status: recorded.payment_status.clone(),
        });

        info!(sale_id = %recorded.id, quantity = %recorded.quantity, "Sale recorded");
        SALES_RECORDED.inc();

        Ok(recorded)
    }

    /// Fetches a single sale ledger row.
    #[instrument(skip(self))]
    pub async fn get_sale(&self, id: Uuid) -> Result<sale::Model, ServiceError> {
        sale::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Sale {} not found", id)))
    }

    /// Lists sale ledger rows, newest first.
    #[instrument(skip(self))]
    pub async fn list_sales(
        &self,
        location_id: Option<Uuid>,
        payment_status: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<sale::Model>, u64), ServiceError> {
        let mut query = sale::Entity::find().order_by_desc(sale::Column::CreatedAt);
        if let Some(location_id) = location_id {
            query = query.filter(sale::Column::LocationId.eq(location_id));
        }
        if let Some(status) = payment_status {
            query = query.filter(sale::Column::PaymentStatus.eq(status));
        }

        let paginator = query.paginate(&*self.db, limit.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }
}
