use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted after successful state changes. Consumers run in a
/// background task; event delivery is best-effort and never blocks the
/// operation that produced the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    CollectionRecorded {
        collection_id: Uuid,
        location_id: Uuid,
        stocked_at: Uuid,
        material: String,
        quantity: Decimal,
    },
    SaleRecorded {
        sale_id: Uuid,
        location_id: Uuid,
        material: String,
        quantity: Decimal,
        payment_status: String,
    },
    StockTransferred {
        transfer_id: Uuid,
        from_location_id: Uuid,
        to_location_id: Uuid,
        material: String,
        quantity: Decimal,
    },
    InventoryAdjusted {
        location_id: Uuid,
        material: String,
        new_quantity: Decimal,
    },
    ExpenseRecorded {
        expense_id: Uuid,
        category: String,
        amount: Decimal,
    },
    TripStatusChanged {
        trip_id: Uuid,
        old_status: String,
        new_status: String,
    },
    UserProvisioned {
        user_id: Uuid,
        role: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Fire-and-forget variant used after a commit: a full or closed channel
    /// must not fail the already-committed operation.
    pub fn send_best_effort(&self, event: Event) {
        if let Err(e) = self.sender.try_send(event) {
            warn!("Dropping domain event: {}", e);
        }
    }
}

/// Background consumer for domain events. Currently logs each event; this is
/// the seam where outbound notifications would attach.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::CollectionRecorded {
                collection_id,
                stocked_at,
                material,
                quantity,
                ..
            } => {
                info!(
                    collection_id = %collection_id,
                    stocked_at = %stocked_at,
                    material = %material,
                    quantity = %quantity,
                    "collection recorded"
                );
            }
            Event::SaleRecorded {
                sale_id,
                material,
                quantity,
                payment_status,
                ..
            } => {
                info!(
                    sale_id = %sale_id,
                    material = %material,
                    quantity = %quantity,
                    payment_status = %payment_status,
                    "sale recorded"
                );
            }
            Event::StockTransferred {
                transfer_id,
                from_location_id,
                to_location_id,
                material,
                quantity,
            } => {
                info!(
                    transfer_id = %transfer_id,
                    from = %from_location_id,
                    to = %to_location_id,
                    material = %material,
                    quantity = %quantity,
                    "stock transferred"
                );
            }
            other => {
                info!(event = ?other, "domain event");
            }
        }
    }
    info!("Event channel closed; event processor exiting");
}
