use crate::{
    entities::{
        inventory_item::{Entity as InventoryItemEntity, ItemCategory},
        ledger_document::{self, DocumentKind, DocumentStatus, Entity as LedgerDocumentEntity},
        order::{Entity as OrderEntity, OrderStatus},
        purchase_record::Entity as PurchaseRecordEntity,
    },
    errors::ServiceError,
    services::alerts::AlertService,
    tracing::{warn_if_slow, SLOW_SCAN},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Iterable, QueryFilter};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryStock {
    pub category: ItemCategory,
    pub item_count: u64,
    pub total_in_stock: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub stock_by_category: Vec<CategoryStock>,
    pub item_count: u64,
    pub total_purchases: Decimal,
    /// Value of every order that was not cancelled
    pub total_sales: Decimal,
    pub total_invoiced: Decimal,
    pub total_expenses: Decimal,
    pub open_orders: u64,
    pub low_stock_count: u64,
    pub expiring_count: u64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ReportService {
    db: Arc<DatabaseConnection>,
    alerts: Arc<AlertService>,
}

impl ReportService {
    pub fn new(db: Arc<DatabaseConnection>, alerts: Arc<AlertService>) -> Self {
        Self { db, alerts }
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardSummary, ServiceError> {
        let started = Instant::now();
        let db = &*self.db;
        let items = InventoryItemEntity::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let purchases = PurchaseRecordEntity::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let orders = OrderEntity::find().all(db).await.map_err(ServiceError::db_error)?;
        let issued = LedgerDocumentEntity::find()
            .filter(ledger_document::Column::Status.eq(DocumentStatus::Issued))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut per_category: BTreeMap<String, CategoryStock> = ItemCategory::iter()
            .map(|category| {
                (
                    category.to_string(),
                    CategoryStock {
                        category,
                        item_count: 0,
                        total_in_stock: Decimal::ZERO,
                    },
                )
            })
            .collect();
        for item in &items {
            if let Some(entry) = per_category.get_mut(&item.category.to_string()) {
                entry.item_count += 1;
                entry.total_in_stock += item.total_in_stock;
            }
        }

        let document_total = |kind: DocumentKind| -> Decimal {
            issued.iter().filter(|d| d.kind == kind).map(|d| d.amount).sum()
        };
        let alerts = self.alerts.scan(Utc::now().date_naive()).await?;
        warn_if_slow("reports.dashboard", started, SLOW_SCAN);

        Ok(DashboardSummary {
            stock_by_category: per_category.into_values().collect(),
            item_count: items.len() as u64,
            total_purchases: purchases.iter().map(|p| p.total_cost).sum(),
            total_sales: orders
                .iter()
                .filter(|o| o.status != OrderStatus::Cancelled)
                .map(|o| o.total_amount)
                .sum(),
            total_invoiced: document_total(DocumentKind::Invoice),
            total_expenses: document_total(DocumentKind::Expense),
            open_orders: orders.iter().filter(|o| !o.status.is_terminal()).count() as u64,
            low_stock_count: alerts.low_stock.len() as u64,
            expiring_count: alerts.expiring.len() as u64,
            generated_at: Utc::now(),
        })
    }
}
