use crate::{
    entities::{
        inventory_item::ItemCategory,
        ledger_document::{self, DocumentKind, SourceType},
        order::{self, Entity as OrderEntity, OrderStatus},
        order_status_change::{self, Entity as OrderStatusChangeEntity},
        stock_movement::MovementKind,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        alerts::AlertService,
        amounts::{line_total, non_negative_amount},
        inventory::{apply_stock_delta, find_item_by_name, StockChange},
        invoicing::{emit_document, void_documents, LedgerDocumentDraft},
        pricing::price_for,
    },
};
use chrono::{DateTime, NaiveDate, Utc};
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

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct NewOrder {
    #[validate(length(min = 1, max = 100))]
    pub customer_name: String,
    #[validate(length(min = 5, max = 20))]
    pub customer_phone: Option<String>,
    #[validate(length(max = 300))]
    pub customer_address: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub breed: String,
    #[validate(range(min = 1, max = 100000))]
    pub quantity: i32,
    /// Falls back to the catalogue price of the breed
    pub unit_price: Option<Decimal>,
    /// Defaults to today
    pub order_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderOutcome {
    pub order: order::Model,
    pub invoice: ledger_document::Model,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    /// Version the caller last saw; the update is rejected if it is stale
    pub expected_version: Option<i32>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}

/// `ORD-20261018-1A2B3C4D`
pub fn order_number(id: Uuid, at: DateTime<Utc>) -> String {
    let hex = id.simple().to_string();
    format!("ORD-{}-{}", at.format("%Y%m%d"), hex[..8].to_ascii_uppercase())
}

async fn record_status_change<C>(
    conn: &C,
    order_id: Uuid,
    from_status: Option<OrderStatus>,
    to_status: OrderStatus,
    note: Option<String>,
    changed_at: DateTime<Utc>,
) -> Result<order_status_change::Model, ServiceError>
where
    C: ConnectionTrait,
{
    order_status_change::ActiveModel {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        from_status: Set(from_status),
        to_status: Set(to_status),
        note: Set(note),
        changed_at: Set(changed_at),
    }
    .insert(conn)
    .await
    .map_err(ServiceError::db_error)
}

/// Chicken sales and their lifecycle
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
    alerts: Arc<AlertService>,
    currency: String,
}

impl OrderService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: EventSender,
        alerts: Arc<AlertService>,
        currency: String,
    ) -> Self {
        Self {
            db,
            event_sender,
            alerts,
            currency,
        }
    }

    /// Takes the birds out of stock, opens the order as `pending` and issues its invoice
    #[instrument(skip(self, new_order), fields(breed = %new_order.breed, quantity = new_order.quantity))]
    pub async fn place_order(&self, new_order: NewOrder) -> Result<OrderOutcome, ServiceError> {
        new_order.validate()?;
        if new_order.customer_name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "customer_name is required".to_string(),
            ));
        }

        let breed = new_order.breed.trim().to_string();
        let unit_price = match new_order.unit_price {
            Some(price) => non_negative_amount("unit_price", price)?,
            None => price_for(&*self.db, &breed).await?.ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "No price set for breed '{}'; provide unit_price",
                    breed
                ))
            })?,
        };

        let item = find_item_by_name(&*self.db, ItemCategory::Chicken, &breed)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("No chicken stock for breed '{}'", breed))
            })?;

        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let quantity = Decimal::from(new_order.quantity);
        let total_amount = line_total(quantity, unit_price)?;

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;
        let applied = apply_stock_delta(
            &txn,
            StockChange {
                item_id: item.id,
                delta: -quantity,
                kind: MovementKind::Order,
                reference_type: Some("order"),
                reference_id: Some(order_id),
                note: None,
            },
        )
        .await?;

        let order = order::ActiveModel {
            id: Set(order_id),
            order_number: Set(order_number(order_id, now)),
            customer_name: Set(new_order.customer_name.trim().to_string()),
            customer_phone: Set(new_order.customer_phone),
            customer_address: Set(new_order.customer_address),
            item_id: Set(item.id),
            breed: Set(item.name.clone()),
            quantity: Set(new_order.quantity),
            unit_price: Set(unit_price),
            total_amount: Set(total_amount),
            status: Set(OrderStatus::Pending),
            order_date: Set(new_order.order_date.unwrap_or_else(|| now.date_naive())),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        record_status_change(&txn, order.id, None, OrderStatus::Pending, None, now).await?;

        let invoice = emit_document(
            &txn,
            LedgerDocumentDraft {
                kind: DocumentKind::Invoice,
                source_type: SourceType::Order,
                source_id: order.id,
                counterparty: order.customer_name.clone(),
                description: format!(
                    "{} x {} ({})",
                    order.quantity, order.breed, order.order_number
                ),
                amount: total_amount,
                currency: self.currency.clone(),
            },
        )
        .await?;

        txn.commit().await.map_err(|e| {
            error!("Failed to commit order placement: {}", e);
            ServiceError::db_error(e)
        })?;

        counter!("henhouse_orders.placed", 1);
        info!(order_id = %order.id, order_number = %order.order_number, "Order placed");

        self.event_sender
            .send_or_log(Event::OrderPlaced {
                order_id: order.id,
                item_id: item.id,
                quantity: order.quantity,
            })
            .await;
        self.event_sender
            .send_or_log(Event::DocumentIssued {
                document_id: invoice.id,
                number: invoice.number.clone(),
                kind: invoice.kind,
            })
            .await;
        self.alerts
            .check_after_decrement(&applied.item, applied.previous_balance)
            .await;

        Ok(OrderOutcome { order, invoice })
    }

    /// Moves an order along its lifecycle.
    ///
    /// Setting the current status again is a no-op. The row is only updated if
    /// both its version and status are still what was read, so of two racing
    /// updates exactly one wins and the other gets `ConcurrentModification`.
    /// Cancelling puts the birds back and voids the invoice in the same transaction.
    #[instrument(skip(self, note))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
        expected_version: Option<i32>,
        note: Option<String>,
    ) -> Result<order::Model, ServiceError> {
        let current = self.get(order_id).await?;
        if current.status == new_status {
            return Ok(current);
        }
        if !current.status.can_transition_to(new_status) {
            return Err(ServiceError::InvalidStatus(format!(
                "Cannot move order {} from {} to {}",
                current.order_number, current.status, new_status
            )));
        }
        let version = expected_version.unwrap_or(current.version);
        if version != current.version {
            return Err(ServiceError::ConcurrentModification(order_id));
        }

        let now = Utc::now();
        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;
        let result = OrderEntity::update_many()
            .col_expr(order::Column::Status, Expr::value(new_status))
            .col_expr(order::Column::Version, Expr::col(order::Column::Version).add(1))
            .col_expr(order::Column::UpdatedAt, Expr::value(now))
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Version.eq(version))
            .filter(order::Column::Status.eq(current.status))
            .exec(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        if result.rows_affected == 0 {
            warn!(%order_id, "Order changed since it was read");
            return Err(ServiceError::ConcurrentModification(order_id));
        }

        record_status_change(&txn, order_id, Some(current.status), new_status, note, now).await?;

        let mut voided = Vec::new();
        if new_status == OrderStatus::Cancelled {
            apply_stock_delta(
                &txn,
                StockChange {
                    item_id: current.item_id,
                    delta: Decimal::from(current.quantity),
                    kind: MovementKind::OrderCancelled,
                    reference_type: Some("order"),
                    reference_id: Some(order_id),
                    note: Some(format!("{} cancelled", current.order_number)),
                },
            )
            .await?;
            voided = void_documents(&txn, SourceType::Order, order_id).await?;
        }

        let updated = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;
        txn.commit().await.map_err(|e| {
            error!("Failed to commit order status change: {}", e);
            ServiceError::db_error(e)
        })?;

        counter!("henhouse_orders.status_changes", 1, "to" => new_status.to_string());
        info!(%order_id, from = %current.status, to = %new_status, "Order status updated");

        self.event_sender
            .send_or_log(Event::OrderStatusChanged {
                order_id,
                old_status: current.status,
                new_status,
            })
            .await;
        if new_status == OrderStatus::Cancelled {
            self.event_sender
                .send_or_log(Event::OrderCancelled {
                    order_id,
                    restored_quantity: current.quantity,
                })
                .await;
            for document in voided {
                self.event_sender
                    .send_or_log(Event::DocumentVoided {
                        document_id: document.id,
                        number: document.number,
                    })
                    .await;
            }
        }

        Ok(updated)
    }

    pub async fn cancel(
        &self,
        order_id: Uuid,
        expected_version: Option<i32>,
        reason: Option<String>,
    ) -> Result<order::Model, ServiceError> {
        self.update_status(order_id, OrderStatus::Cancelled, expected_version, reason)
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<order::Model, ServiceError> {
        OrderEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: OrderFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<order::Model>, u64), ServiceError> {
        let mut query = OrderEntity::find()
            .order_by_desc(order::Column::OrderDate)
            .order_by_desc(order::Column::CreatedAt);
        if let Some(status) = filter.status {
            query = query.filter(order::Column::Status.eq(status));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let orders = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((orders, total))
    }

    /// Status changes of one order, oldest first
    pub async fn history(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<order_status_change::Model>, ServiceError> {
        self.get(order_id).await?;
        OrderStatusChangeEntity::find()
            .filter(order_status_change::Column::OrderId.eq(order_id))
            .order_by_asc(order_status_change::Column::ChangedAt)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }
}
