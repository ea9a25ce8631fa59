use crate::{
    entities::{
        inventory_item::{self, Entity as InventoryItemEntity, ItemCategory},
        ledger_document::{self, DocumentKind, SourceType},
        purchase_record::{self, Entity as PurchaseRecordEntity},
        stock_movement::MovementKind,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        inventory::{apply_stock_delta, find_item_by_name, insert_empty_item, StockChange},
        amounts::{line_total, non_negative_amount, positive_quantity, whole_if_counted},
        invoicing::{emit_document, LedgerDocumentDraft},
    },
};
use chrono::{NaiveDate, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct NewPurchase {
    #[validate(length(min = 1, max = 100))]
    pub vendor: String,
    pub category: ItemCategory,
    #[validate(length(min = 1, max = 100))]
    pub item_name: String,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub purchase_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl NewPurchase {
    fn check_amounts(&self) -> Result<(), ServiceError> {
        if self.vendor.trim().is_empty() || self.item_name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "vendor and item_name are required".to_string(),
            ));
        }
        positive_quantity("quantity", self.quantity)?;
        non_negative_amount("unit_price", self.unit_price)?;
        whole_if_counted(self.category, "quantity", self.quantity)?;
        Ok(())
    }
}

/// Finds the item a purchase goes into, creating it on first purchase. A
/// concurrent first purchase of the same item loses the insert and reuses the
/// winner's row.
async fn item_for_purchase(
    txn: &DatabaseTransaction,
    purchase: &NewPurchase,
) -> Result<inventory_item::Model, ServiceError> {
    if let Some(item) = find_item_by_name(txn, purchase.category, &purchase.item_name).await? {
        return Ok(item);
    }

    let savepoint = txn.begin().await.map_err(ServiceError::db_error)?;
    match insert_empty_item(
        &savepoint,
        purchase.category,
        &purchase.item_name,
        &purchase.unit,
        None,
        None,
    )
    .await
    {
        Ok(item) => {
            savepoint.commit().await.map_err(ServiceError::db_error)?;
            Ok(item)
        }
        Err(ServiceError::Conflict(_)) => {
            savepoint.rollback().await.map_err(ServiceError::db_error)?;
            find_item_by_name(txn, purchase.category, &purchase.item_name)
                .await?
                .ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "{} '{}' vanished after a conflicting insert",
                        purchase.category, purchase.item_name
                    ))
                })
        }
        Err(e) => Err(e),
    }
}

/// Everything a purchase wrote in its transaction
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PurchaseOutcome {
    pub purchase: purchase_record::Model,
    pub item: inventory_item::Model,
    pub expense: ledger_document::Model,
}

#[derive(Debug, Clone, Default)]
pub struct PurchaseFilter {
    pub category: Option<ItemCategory>,
    pub vendor: Option<String>,
}

#[derive(Clone)]
pub struct PurchaseService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
    currency: String,
}

impl PurchaseService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender, currency: String) -> Self {
        Self {
            db,
            event_sender,
            currency,
        }
    }

    /// Records a purchase: the item is created on first purchase, the stock
    /// goes up and an expense is issued, all or nothing.
    #[instrument(skip(self, purchase), fields(vendor = %purchase.vendor, item = %purchase.item_name))]
    pub async fn record_purchase(
        &self,
        purchase: NewPurchase,
    ) -> Result<PurchaseOutcome, ServiceError> {
        purchase.validate()?;
        purchase.check_amounts()?;

        let total_cost = line_total(purchase.quantity, purchase.unit_price)?;
        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let item = item_for_purchase(&txn, &purchase).await?;
        if purchase.unit.trim() != item.unit {
            return Err(ServiceError::ValidationError(format!(
                "{} is stocked in {}, not {}",
                item.name,
                item.unit,
                purchase.unit.trim()
            )));
        }

        let record = purchase_record::ActiveModel {
            id: Set(Uuid::new_v4()),
            item_id: Set(item.id),
            vendor: Set(purchase.vendor.trim().to_string()),
            category: Set(purchase.category),
            item_name: Set(item.name.clone()),
            unit: Set(item.unit.clone()),
            quantity: Set(purchase.quantity),
            unit_price: Set(purchase.unit_price),
            total_cost: Set(total_cost),
            purchase_date: Set(purchase.purchase_date),
            expiry_date: Set(purchase.expiry_date),
            notes: Set(purchase.notes.clone()),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        let mut item = apply_stock_delta(
            &txn,
            StockChange {
                item_id: item.id,
                delta: purchase.quantity,
                kind: MovementKind::Purchase,
                reference_type: Some("purchase"),
                reference_id: Some(record.id),
                note: None,
            },
        )
        .await?
        .item;

        // the item tracks the earliest expiry among its batches
        if let Some(expiry) = purchase.expiry_date {
            if item.expiry_date.map_or(true, |current| expiry < current) {
                InventoryItemEntity::update_many()
                    .col_expr(inventory_item::Column::ExpiryDate, Expr::value(expiry))
                    .filter(inventory_item::Column::Id.eq(item.id))
                    .exec(&txn)
                    .await
                    .map_err(ServiceError::db_error)?;
                item.expiry_date = Some(expiry);
            }
        }

        let expense = emit_document(
            &txn,
            LedgerDocumentDraft {
                kind: DocumentKind::Expense,
                source_type: SourceType::Purchase,
                source_id: record.id,
                counterparty: record.vendor.clone(),
                description: format!(
                    "{} {} of {}",
                    record.quantity.normalize(),
                    record.unit,
                    record.item_name
                ),
                amount: total_cost,
                currency: self.currency.clone(),
            },
        )
        .await?;

        txn.commit().await.map_err(|e| {
            error!("Failed to commit purchase: {}", e);
            ServiceError::db_error(e)
        })?;

        counter!("henhouse_purchases.recorded", 1, "category" => purchase.category.to_string());
        info!(purchase_id = %record.id, item_id = %item.id, "Purchase recorded");

        self.event_sender
            .send_or_log(Event::PurchaseRecorded {
                purchase_id: record.id,
                item_id: item.id,
                quantity: record.quantity,
            })
            .await;
        self.event_sender
            .send_or_log(Event::DocumentIssued {
                document_id: expense.id,
                number: expense.number.clone(),
                kind: expense.kind,
            })
            .await;

        Ok(PurchaseOutcome {
            purchase: record,
            item,
            expense,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<purchase_record::Model, ServiceError> {
        PurchaseRecordEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase {} not found", id)))
    }

    /// Newest purchases first
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: PurchaseFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<purchase_record::Model>, u64), ServiceError> {
        let mut query = PurchaseRecordEntity::find()
            .order_by_desc(purchase_record::Column::PurchaseDate)
            .order_by_desc(purchase_record::Column::CreatedAt);
        if let Some(category) = filter.category {
            query = query.filter(purchase_record::Column::Category.eq(category));
        }
        if let Some(vendor) = filter.vendor.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            query = query.filter(purchase_record::Column::Vendor.eq(vendor));
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

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn purchase(quantity: Decimal, unit_price: Decimal) -> NewPurchase {
        NewPurchase {
            vendor: "Sri Balaji Feeds".into(),
            category: ItemCategory::Feed,
            item_name: "Layer Mash".into(),
            unit: "kg".into(),
            quantity,
            unit_price,
            purchase_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            expiry_date: None,
            notes: None,
        }
    }

    #[test]
    fn amounts_are_checked() {
        assert!(purchase(dec!(10), dec!(0)).check_amounts().is_ok());
        assert!(purchase(dec!(0), dec!(5)).check_amounts().is_err());
        assert!(purchase(dec!(10), dec!(-1)).check_amounts().is_err());

        let mut blank_vendor = purchase(dec!(10), dec!(5));
        blank_vendor.vendor = "   ".into();
        assert!(blank_vendor.check_amounts().is_err());
    }

    #[test]
    fn chickens_are_bought_whole() {
        let mut birds = purchase(dec!(2.5), dec!(300));
        birds.category = ItemCategory::Chicken;
        assert!(birds.check_amounts().is_err());

        birds.quantity = dec!(25.0);
        assert!(birds.check_amounts().is_ok());
    }

    #[test]
    fn quantities_beyond_the_column_are_rejected() {
        assert!(purchase(dec!(0.00001), dec!(5)).check_amounts().is_err());
        assert!(purchase(dec!(70000000000000000000), dec!(10000000000))
            .check_amounts()
            .is_err());
    }
}
