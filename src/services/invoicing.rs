use crate::{
    entities::{
        inventory_item::{self, Entity as InventoryItemEntity},
        ledger_document::{
            self, DocumentKind, DocumentStatus, Entity as LedgerDocumentEntity, SourceType,
        },
        order::{self, Entity as OrderEntity, OrderStatus},
        payroll_payment::{self, Entity as PayrollPaymentEntity},
        purchase_record::{self, Entity as PurchaseRecordEntity},
        stock_movement::{self, Entity as StockMovementEntity},
    },
    errors::ServiceError,
    services::amounts::SCALE,
    tracing::{warn_if_slow, SLOW_SCAN},
};
use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Everything needed to issue a companion document for a source transaction
#[derive(Debug, Clone)]
pub struct LedgerDocumentDraft {
    pub kind: DocumentKind,
    pub source_type: SourceType,
    pub source_id: Uuid,
    pub counterparty: String,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
}

/// `INV-20261018-1A2B3C4D`: kind prefix, issue date, first eight hex digits of the id
pub fn document_number(kind: DocumentKind, id: Uuid, issued_at: DateTime<Utc>) -> String {
    let hex = id.simple().to_string();
    format!(
        "{}-{}-{}",
        kind.number_prefix(),
        issued_at.format("%Y%m%d"),
        hex[..8].to_ascii_uppercase()
    )
}

/// Issues the document on the caller's transaction. A second document of the
/// same kind for the same source violates a unique index and surfaces as `Conflict`.
pub async fn emit_document<C>(
    conn: &C,
    draft: LedgerDocumentDraft,
) -> Result<ledger_document::Model, ServiceError>
where
    C: ConnectionTrait,
{
    if draft.amount < Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Document amount cannot be negative".to_string(),
        ));
    }

    let id = Uuid::new_v4();
    let issued_at = Utc::now();
    let document = ledger_document::ActiveModel {
        id: Set(id),
        number: Set(document_number(draft.kind, id, issued_at)),
        kind: Set(draft.kind),
        status: Set(DocumentStatus::Issued),
        source_type: Set(draft.source_type),
        source_id: Set(draft.source_id),
        counterparty: Set(draft.counterparty),
        description: Set(draft.description),
        amount: Set(draft.amount),
        currency: Set(draft.currency),
        issued_at: Set(issued_at),
        voided_at: Set(None),
    }
    .insert(conn)
    .await
    .map_err(ServiceError::db_error)?;

    counter!("henhouse_ledger.documents_issued", 1, "kind" => draft.kind.to_string());
    Ok(document)
}

/// Marks the issued documents of a source transaction as void and returns them
pub async fn void_documents<C>(
    conn: &C,
    source_type: SourceType,
    source_id: Uuid,
) -> Result<Vec<ledger_document::Model>, ServiceError>
where
    C: ConnectionTrait,
{
    let result = LedgerDocumentEntity::update_many()
        .col_expr(
            ledger_document::Column::Status,
            Expr::value(DocumentStatus::Void),
        )
        .col_expr(ledger_document::Column::VoidedAt, Expr::value(Utc::now()))
        .filter(ledger_document::Column::SourceType.eq(source_type))
        .filter(ledger_document::Column::SourceId.eq(source_id))
        .filter(ledger_document::Column::Status.eq(DocumentStatus::Issued))
        .exec(conn)
        .await
        .map_err(ServiceError::db_error)?;

    if result.rows_affected == 0 {
        warn!(%source_type, %source_id, "No issued document to void");
        return Ok(Vec::new());
    }

    LedgerDocumentEntity::find()
        .filter(ledger_document::Column::SourceType.eq(source_type))
        .filter(ledger_document::Column::SourceId.eq(source_id))
        .filter(ledger_document::Column::Status.eq(DocumentStatus::Void))
        .all(conn)
        .await
        .map_err(ServiceError::db_error)
}

#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub kind: Option<DocumentKind>,
    pub status: Option<DocumentStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MissingDocument {
    pub source_type: SourceType,
    pub source_id: Uuid,
    pub expected_kind: DocumentKind,
    pub expected_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AmountMismatch {
    pub document_id: Uuid,
    pub number: String,
    pub source_type: SourceType,
    pub source_id: Uuid,
    pub expected_amount: Decimal,
    pub document_amount: Decimal,
}

/// A document whose status disagrees with its source, e.g. a live invoice for
/// a cancelled order
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatusMismatch {
    pub document_id: Uuid,
    pub number: String,
    pub expected_status: DocumentStatus,
    pub document_status: DocumentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrphanDocument {
    pub document_id: Uuid,
    pub number: String,
    pub source_type: SourceType,
    pub source_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StockDrift {
    pub item_id: Uuid,
    pub name: String,
    pub recorded_stock: Decimal,
    pub ledger_sum: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ReconciliationReport {
    pub checked_sources: usize,
    pub checked_documents: usize,
    pub missing_documents: Vec<MissingDocument>,
    pub amount_mismatches: Vec<AmountMismatch>,
    pub status_mismatches: Vec<StatusMismatch>,
    pub orphan_documents: Vec<OrphanDocument>,
    pub stock_drift: Vec<StockDrift>,
    pub balanced: bool,
}

struct ExpectedDocument {
    kind: DocumentKind,
    source_type: SourceType,
    source_id: Uuid,
    amount: Decimal,
    status: DocumentStatus,
}

fn same_amount(a: Decimal, b: Decimal) -> bool {
    a.round_dp(SCALE) == b.round_dp(SCALE)
}

/// Read side of the invoice and expense ledger
#[derive(Clone)]
pub struct InvoicingService {
    db: Arc<DatabaseConnection>,
}

impl InvoicingService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: Uuid) -> Result<ledger_document::Model, ServiceError> {
        LedgerDocumentEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Ledger document {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: DocumentFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<ledger_document::Model>, u64), ServiceError> {
        let mut query =
            LedgerDocumentEntity::find().order_by_desc(ledger_document::Column::IssuedAt);
        if let Some(kind) = filter.kind {
            query = query.filter(ledger_document::Column::Kind.eq(kind));
        }
        if let Some(status) = filter.status {
            query = query.filter(ledger_document::Column::Status.eq(status));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let documents = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((documents, total))
    }

    /// Cross-checks every purchase, order and payroll payment against its
    /// companion document, and every item's balance against its movements.
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<ReconciliationReport, ServiceError> {
        let started = Instant::now();
        let db = &*self.db;
        let purchases = PurchaseRecordEntity::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let orders = OrderEntity::find().all(db).await.map_err(ServiceError::db_error)?;
        let payments = PayrollPaymentEntity::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let documents = LedgerDocumentEntity::find()
            .order_by_asc(ledger_document::Column::IssuedAt)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let expected: Vec<ExpectedDocument> = purchases
            .iter()
            .map(|p: &purchase_record::Model| ExpectedDocument {
                kind: DocumentKind::Expense,
                source_type: SourceType::Purchase,
                source_id: p.id,
                amount: p.total_cost,
                status: DocumentStatus::Issued,
            })
            .chain(orders.iter().map(|o: &order::Model| ExpectedDocument {
                kind: DocumentKind::Invoice,
                source_type: SourceType::Order,
                source_id: o.id,
                amount: o.total_amount,
                status: if o.status == OrderStatus::Cancelled {
                    DocumentStatus::Void
                } else {
                    DocumentStatus::Issued
                },
            }))
            .chain(payments.iter().map(|p: &payroll_payment::Model| ExpectedDocument {
                kind: DocumentKind::Expense,
                source_type: SourceType::Payroll,
                source_id: p.id,
                amount: p.gross_amount,
                status: DocumentStatus::Issued,
            }))
            .collect();

        let mut by_source: HashMap<(DocumentKind, SourceType, Uuid), &ledger_document::Model> =
            documents
                .iter()
                .map(|d| ((d.kind, d.source_type, d.source_id), d))
                .collect();

        let mut report = ReconciliationReport {
            checked_sources: expected.len(),
            checked_documents: documents.len(),
            ..Default::default()
        };

        for exp in &expected {
            match by_source.remove(&(exp.kind, exp.source_type, exp.source_id)) {
                None => report.missing_documents.push(MissingDocument {
                    source_type: exp.source_type,
                    source_id: exp.source_id,
                    expected_kind: exp.kind,
                    expected_amount: exp.amount,
                }),
                Some(doc) => {
                    if !same_amount(doc.amount, exp.amount) {
                        report.amount_mismatches.push(AmountMismatch {
                            document_id: doc.id,
                            number: doc.number.clone(),
                            source_type: exp.source_type,
                            source_id: exp.source_id,
                            expected_amount: exp.amount,
                            document_amount: doc.amount,
                        });
                    }
                    if doc.status != exp.status {
                        report.status_mismatches.push(StatusMismatch {
                            document_id: doc.id,
                            number: doc.number.clone(),
                            expected_status: exp.status,
                            document_status: doc.status,
                        });
                    }
                }
            }
        }

        // whatever is left has no source transaction
        let mut orphans: Vec<OrphanDocument> = by_source
            .into_values()
            .map(|doc| OrphanDocument {
                document_id: doc.id,
                number: doc.number.clone(),
                source_type: doc.source_type,
                source_id: doc.source_id,
            })
            .collect();
        orphans.sort_by(|a, b| a.number.cmp(&b.number));
        report.orphan_documents = orphans;

        report.stock_drift = self.stock_drift().await?;

        report.balanced = report.missing_documents.is_empty()
            && report.amount_mismatches.is_empty()
            && report.status_mismatches.is_empty()
            && report.orphan_documents.is_empty()
            && report.stock_drift.is_empty();

        if report.balanced {
            info!(
                sources = report.checked_sources,
                documents = report.checked_documents,
                "Ledger reconciled"
            );
        } else {
            warn!(
                missing = report.missing_documents.len(),
                amount_mismatches = report.amount_mismatches.len(),
                status_mismatches = report.status_mismatches.len(),
                orphans = report.orphan_documents.len(),
                drift = report.stock_drift.len(),
                "Ledger out of balance"
            );
        }
        warn_if_slow("ledger.reconcile", started, SLOW_SCAN);
        Ok(report)
    }

    async fn stock_drift(&self) -> Result<Vec<StockDrift>, ServiceError> {
        let items = InventoryItemEntity::find()
            .order_by_asc(inventory_item::Column::Name)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        let movements = StockMovementEntity::find()
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut sums: HashMap<Uuid, Decimal> = HashMap::new();
        for movement in &movements {
            *sums.entry(movement.item_id).or_default() += movement.delta;
        }

        Ok(items
            .into_iter()
            .filter_map(|item: inventory_item::Model| {
                let ledger_sum = sums.get(&item.id).copied().unwrap_or_default();
                (!same_amount(ledger_sum, item.total_in_stock)).then(|| StockDrift {
                    item_id: item.id,
                    name: item.name,
                    recorded_stock: item.total_in_stock,
                    ledger_sum,
                })
            })
            .collect())
    }
}
