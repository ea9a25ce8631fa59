use crate::{
    entities::{
        inventory_item::{self, ItemCategory},
        stock_movement::MovementKind,
        usage_record::{self, Entity as UsageRecordEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        alerts::AlertService,
        amounts::positive_quantity,
        inventory::{apply_stock_delta, find_item_by_name, StockChange},
    },
};
use chrono::{NaiveDate, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Feed or medicine taken out of stock
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct NewUsage {
    pub category: ItemCategory,
    #[validate(length(min = 1, max = 100))]
    pub item_name: String,
    pub quantity: Decimal,
    pub usage_date: NaiveDate,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UsageOutcome {
    pub usage: usage_record::Model,
    pub item: inventory_item::Model,
    /// Whether this usage took the item below its reorder threshold
    pub low_stock_warning: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UsageFilter {
    pub category: Option<ItemCategory>,
    pub item_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct UsageService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
    alerts: Arc<AlertService>,
}

impl UsageService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: EventSender,
        alerts: Arc<AlertService>,
    ) -> Self {
        Self {
            db,
            event_sender,
            alerts,
        }
    }

    /// Consumes stock. A rejected usage leaves no trace: neither the record nor
    /// the movement is written.
    #[instrument(skip(self, usage), fields(category = %usage.category, item = %usage.item_name))]
    pub async fn record_usage(&self, usage: NewUsage) -> Result<UsageOutcome, ServiceError> {
        usage.validate()?;
        if !usage.category.is_consumable() {
            return Err(ServiceError::ValidationError(format!(
                "{} stock leaves through orders, not usage",
                usage.category
            )));
        }
        positive_quantity("quantity", usage.quantity)?;

        let item = find_item_by_name(&*self.db, usage.category, &usage.item_name)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "{} '{}' not found",
                    usage.category,
                    usage.item_name.trim()
                ))
            })?;

        let usage_id = Uuid::new_v4();
        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;
        let applied = apply_stock_delta(
            &txn,
            StockChange {
                item_id: item.id,
                delta: -usage.quantity,
                kind: MovementKind::Usage,
                reference_type: Some("usage"),
                reference_id: Some(usage_id),
                note: usage.notes.clone(),
            },
        )
        .await?;

        let record = usage_record::ActiveModel {
            id: Set(usage_id),
            item_id: Set(item.id),
            category: Set(item.category),
            item_name: Set(item.name.clone()),
            unit: Set(item.unit.clone()),
            quantity: Set(usage.quantity),
            usage_date: Set(usage.usage_date),
            notes: Set(usage.notes),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;
        txn.commit().await.map_err(ServiceError::db_error)?;

        counter!("henhouse_usage.recorded", 1, "category" => item.category.to_string());
        info!(usage_id = %record.id, balance = %applied.item.total_in_stock, "Usage recorded");

        self.event_sender
            .send_or_log(Event::UsageRecorded {
                usage_id: record.id,
                item_id: item.id,
                quantity: record.quantity,
            })
            .await;
        let low_stock_warning = self
            .alerts
            .check_after_decrement(&applied.item, applied.previous_balance)
            .await;

        Ok(UsageOutcome {
            usage: record,
            item: applied.item,
            low_stock_warning,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<usage_record::Model, ServiceError> {
        UsageRecordEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Usage record {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: UsageFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<usage_record::Model>, u64), ServiceError> {
        let mut query = UsageRecordEntity::find()
            .order_by_desc(usage_record::Column::UsageDate)
            .order_by_desc(usage_record::Column::CreatedAt);
        if let Some(category) = filter.category {
            query = query.filter(usage_record::Column::Category.eq(category));
        }
        if let Some(item_id) = filter.item_id {
            query = query.filter(usage_record::Column::ItemId.eq(item_id));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let records = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((records, total))
    }
}
