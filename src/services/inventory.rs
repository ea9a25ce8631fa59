use crate::{
    entities::{
        inventory_item::{self, Entity as InventoryItemEntity, ItemCategory},
        stock_movement::{self, Entity as StockMovementEntity, MovementKind},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        alerts::AlertService,
        amounts::{non_negative_amount, non_zero_quantity, whole_if_counted},
    },
};
use chrono::{NaiveDate, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A signed change to one item's stock, applied inside the caller's transaction.
#[derive(Debug, Clone)]
pub struct StockChange {
    pub item_id: Uuid,
    pub delta: Decimal,
    pub kind: MovementKind,
    pub reference_type: Option<&'static str>,
    pub reference_id: Option<Uuid>,
    pub note: Option<String>,
}

/// Result of a committed stock change
#[derive(Debug, Clone)]
pub struct AppliedStockChange {
    pub item: inventory_item::Model,
    pub previous_balance: Decimal,
    pub movement: stock_movement::Model,
}

/// Applies `change` with a conditional update so the balance can never go
/// negative, then appends the matching movement row.
///
/// The `WHERE total_in_stock >= -delta` guard makes the read-check-write a single
/// statement: of two writers racing for the same stock at most one succeeds.
pub async fn apply_stock_delta<C>(
    conn: &C,
    change: StockChange,
) -> Result<AppliedStockChange, ServiceError>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    let result = InventoryItemEntity::update_many()
        .col_expr(
            inventory_item::Column::TotalInStock,
            Expr::col(inventory_item::Column::TotalInStock).add(change.delta),
        )
        .col_expr(
            inventory_item::Column::Version,
            Expr::col(inventory_item::Column::Version).add(1),
        )
        .col_expr(inventory_item::Column::LastUpdated, Expr::value(now))
        .filter(inventory_item::Column::Id.eq(change.item_id))
        .filter(inventory_item::Column::TotalInStock.gte(-change.delta))
        .exec(conn)
        .await
        .map_err(ServiceError::db_error)?;

    let item = InventoryItemEntity::find_by_id(change.item_id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Inventory item {} not found", change.item_id))
        })?;

    if result.rows_affected == 0 {
        counter!("henhouse_inventory.insufficient_stock", 1);
        warn!(
            item_id = %item.id,
            available = %item.total_in_stock,
            requested = %change.delta.abs(),
            "Rejected stock change"
        );
        return Err(ServiceError::InsufficientStock(format!(
            "{} has {} {}, requested {}",
            item.name,
            item.total_in_stock.normalize(),
            item.unit,
            change.delta.abs().normalize()
        )));
    }

    let movement = stock_movement::ActiveModel {
        id: Set(Uuid::new_v4()),
        item_id: Set(item.id),
        delta: Set(change.delta),
        kind: Set(change.kind),
        reference_type: Set(change.reference_type.map(str::to_string)),
        reference_id: Set(change.reference_id),
        balance_after: Set(item.total_in_stock),
        note: Set(change.note),
        created_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(ServiceError::db_error)?;

    counter!("henhouse_inventory.movements", 1, "kind" => change.kind.to_string());

    Ok(AppliedStockChange {
        previous_balance: item.total_in_stock - change.delta,
        item,
        movement,
    })
}

/// Indexed lookup on the unique `(category, name)` pair
pub async fn find_item_by_name<C>(
    conn: &C,
    category: ItemCategory,
    name: &str,
) -> Result<Option<inventory_item::Model>, ServiceError>
where
    C: ConnectionTrait,
{
    InventoryItemEntity::find()
        .filter(inventory_item::Column::Category.eq(category))
        .filter(inventory_item::Column::Name.eq(name.trim()))
        .one(conn)
        .await
        .map_err(ServiceError::db_error)
}

/// Inserts an item with zero stock. Opening stock, if any, goes through
/// [`apply_stock_delta`] so it shows up in the ledger.
pub(crate) async fn insert_empty_item<C>(
    conn: &C,
    category: ItemCategory,
    name: &str,
    unit: &str,
    reorder_threshold: Option<Decimal>,
    expiry_date: Option<NaiveDate>,
) -> Result<inventory_item::Model, ServiceError>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    inventory_item::ActiveModel {
        id: Set(Uuid::new_v4()),
        category: Set(category),
        name: Set(name.trim().to_string()),
        unit: Set(unit.trim().to_string()),
        total_in_stock: Set(Decimal::ZERO),
        reorder_threshold: Set(reorder_threshold),
        expiry_date: Set(expiry_date),
        version: Set(1),
        created_at: Set(now),
        last_updated: Set(now),
    }
    .insert(conn)
    .await
    .map_err(ServiceError::db_error)
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct NewInventoryItem {
    pub category: ItemCategory,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    #[serde(default)]
    pub opening_stock: Decimal,
    pub reorder_threshold: Option<Decimal>,
    pub expiry_date: Option<NaiveDate>,
}

/// Descriptive fields that can be edited; stock only changes through movements.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct InventoryItemPatch {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
    pub reorder_threshold: Option<Decimal>,
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub clear_expiry_date: bool,
}

impl InventoryItemPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.unit.is_none()
            && self.reorder_threshold.is_none()
            && self.expiry_date.is_none()
            && !self.clear_expiry_date
    }
}

#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    pub category: Option<ItemCategory>,
}

/// Service for the stock ledger: items, their balances and movements
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
    alerts: Arc<AlertService>,
}

impl InventoryService {
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

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<inventory_item::Model, ServiceError> {
        InventoryItemEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Inventory item {} not found", id)))
    }

    /// Returns one page of items and the total number of matches
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: InventoryFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<inventory_item::Model>, u64), ServiceError> {
        let mut query = InventoryItemEntity::find()
            .order_by_asc(inventory_item::Column::Category)
            .order_by_asc(inventory_item::Column::Name);
        if let Some(category) = filter.category {
            query = query.filter(inventory_item::Column::Category.eq(category));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((items, total))
    }

    pub async fn find_by_name(
        &self,
        category: ItemCategory,
        name: &str,
    ) -> Result<Option<inventory_item::Model>, ServiceError> {
        find_item_by_name(&*self.db, category, name).await
    }

    #[instrument(skip(self, new_item), fields(category = %new_item.category, name = %new_item.name))]
    pub async fn create(
        &self,
        new_item: NewInventoryItem,
    ) -> Result<inventory_item::Model, ServiceError> {
        new_item.validate()?;
        non_negative_amount("opening_stock", new_item.opening_stock)?;
        whole_if_counted(new_item.category, "opening_stock", new_item.opening_stock)?;
        if let Some(threshold) = new_item.reorder_threshold {
            non_negative_amount("reorder_threshold", threshold)?;
        }

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;
        if find_item_by_name(&txn, new_item.category, &new_item.name)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "{} '{}' already exists",
                new_item.category, new_item.name
            )));
        }

        let mut item = insert_empty_item(
            &txn,
            new_item.category,
            &new_item.name,
            &new_item.unit,
            new_item.reorder_threshold,
            new_item.expiry_date,
        )
        .await?;

        if new_item.opening_stock > Decimal::ZERO {
            item = apply_stock_delta(
                &txn,
                StockChange {
                    item_id: item.id,
                    delta: new_item.opening_stock,
                    kind: MovementKind::Opening,
                    reference_type: None,
                    reference_id: None,
                    note: Some("opening stock".to_string()),
                },
            )
            .await?
            .item;
        }

        txn.commit().await.map_err(|e| {
            error!("Failed to commit inventory item creation: {}", e);
            ServiceError::db_error(e)
        })?;

        info!(item_id = %item.id, "Inventory item created");
        Ok(item)
    }

    /// Updates descriptive fields if the caller saw the current version
    #[instrument(skip(self, patch))]
    pub async fn set(
        &self,
        id: Uuid,
        patch: InventoryItemPatch,
        expected_version: i32,
    ) -> Result<inventory_item::Model, ServiceError> {
        patch.validate()?;
        if patch.is_empty() {
            return Err(ServiceError::ValidationError("Nothing to update".to_string()));
        }
        if let Some(threshold) = patch.reorder_threshold {
            non_negative_amount("reorder_threshold", threshold)?;
        }

        let mut update = InventoryItemEntity::update_many()
            .col_expr(
                inventory_item::Column::Version,
                Expr::col(inventory_item::Column::Version).add(1),
            )
            .col_expr(inventory_item::Column::LastUpdated, Expr::value(Utc::now()));
        if let Some(name) = &patch.name {
            update = update.col_expr(inventory_item::Column::Name, Expr::value(name.trim()));
        }
        if let Some(unit) = &patch.unit {
            update = update.col_expr(inventory_item::Column::Unit, Expr::value(unit.trim()));
        }
        if let Some(threshold) = patch.reorder_threshold {
            update = update.col_expr(
                inventory_item::Column::ReorderThreshold,
                Expr::value(threshold),
            );
        }
        if patch.clear_expiry_date {
            update = update.col_expr(
                inventory_item::Column::ExpiryDate,
                Expr::value(Option::<NaiveDate>::None),
            );
        } else if let Some(expiry) = patch.expiry_date {
            update = update.col_expr(inventory_item::Column::ExpiryDate, Expr::value(expiry));
        }

        let result = update
            .filter(inventory_item::Column::Id.eq(id))
            .filter(inventory_item::Column::Version.eq(expected_version))
            .exec(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        let item = self.get(id).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::ConcurrentModification(id));
        }
        Ok(item)
    }

    /// Manual stock correction, e.g. after a physical count
    #[instrument(skip(self))]
    pub async fn adjust(
        &self,
        id: Uuid,
        delta: Decimal,
        reason: String,
    ) -> Result<inventory_item::Model, ServiceError> {
        non_zero_quantity("delta", delta)?;
        if reason.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Adjustment reason is required".to_string(),
            ));
        }
        let item = self.get(id).await?;
        whole_if_counted(item.category, "delta", delta)?;

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;
        let applied = apply_stock_delta(
            &txn,
            StockChange {
                item_id: id,
                delta,
                kind: MovementKind::Adjustment,
                reference_type: None,
                reference_id: None,
                note: Some(reason.clone()),
            },
        )
        .await?;
        txn.commit().await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::StockAdjusted {
                item_id: id,
                delta,
                reason,
            })
            .await;
        if delta < Decimal::ZERO {
            self.alerts
                .check_after_decrement(&applied.item, applied.previous_balance)
                .await;
        }

        Ok(applied.item)
    }

    /// The ledger of one item, oldest first
    pub async fn movements(&self, id: Uuid) -> Result<Vec<stock_movement::Model>, ServiceError> {
        self.get(id).await?;
        StockMovementEntity::find()
            .filter(stock_movement::Column::ItemId.eq(id))
            .order_by_asc(stock_movement::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }
}
