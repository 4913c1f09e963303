use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{expense, location},
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordExpenseInput {
    pub category: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub location_id: Option<Uuid>,
    pub incurred_on: NaiveDate,
}

/// Operating expenses: fuel, wages, rent, maintenance.
#[derive(Clone)]
pub struct ExpenseService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl ExpenseService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(category = %input.category))]
    pub async fn record_expense(
        &self,
        actor: Uuid,
        input: RecordExpenseInput,
    ) -> Result<expense::Model, ServiceError> {
        if input.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Expense amount must be positive".to_string(),
            ));
        }
        if input.category.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Expense category cannot be empty".to_string(),
            ));
        }
        if let Some(location_id) = input.location_id {
            location::Entity::find_by_id(location_id)
                .one(&*self.db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Location {} not found", location_id))
                })?;
        }

        let row = expense::ActiveModel {
            id: Set(Uuid::new_v4()),
            category: Set(input.category),
            amount: Set(input.amount),
            description: Set(input.description),
            location_id: Set(input.location_id),
            incurred_on: Set(input.incurred_on),
            recorded_by: Set(actor),
            created_at: Set(Utc::now()),
        };
        let recorded = row.insert(&*self.db).await?;

        self.event_sender.send_best_effort(Event::ExpenseRecorded {
            expense_id: recorded.id,
            category: recorded.category.clone(),
            amount: recorded.amount,
        });

        Ok(recorded)
    }

    #[instrument(skip(self))]
    pub async fn get_expense(&self, id: Uuid) -> Result<expense::Model, ServiceError> {
        expense::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Expense {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_expenses(
        &self,
        category: Option<String>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<expense::Model>, u64), ServiceError> {
        let mut query = expense::Entity::find().order_by_desc(expense::Column::IncurredOn);
        if let Some(category) = category {
            query = query.filter(expense::Column::Category.eq(category));
        }
        if let Some(from) = from {
            query = query.filter(expense::Column::IncurredOn.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(expense::Column::IncurredOn.lte(to));
        }

        let paginator = query.paginate(&*self.db, limit.max(1));
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn delete_expense(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_expense(id).await?;
        existing.delete(&*self.db).await?;
        Ok(())
    }
}
