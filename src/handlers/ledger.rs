use crate::{
    entities::{ledger_document, DocumentKind, DocumentStatus},
    errors::ServiceError,
    handlers::common::{ok, page_window, paginated},
    services::invoicing::{DocumentFilter, ReconciliationReport},
    ApiResponse, AppState, ListQuery, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DocumentFilters {
    pub kind: Option<DocumentKind>,
    pub status: Option<DocumentStatus>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledger", get(list_documents))
        .route("/ledger/reconciliation", get(reconcile))
        .route("/ledger/:id", get(get_document))
}

/// Invoices and expenses, newest first
#[utoipa::path(
    get,
    path = "/api/v1/ledger",
    params(DocumentFilters, ListQuery),
    responses(
        (status = 200, description = "Ledger documents", body = [ledger_document::Model])
    ),
    security(("bearer_auth" = [])),
    tag = "ledger"
)]
pub async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filters): Query<DocumentFilters>,
) -> Result<Json<ApiResponse<PaginatedResponse<ledger_document::Model>>>, ServiceError> {
    let (page, limit) = page_window(&state, &query);
    let (documents, total) = state
        .services
        .invoicing
        .list(
            DocumentFilter {
                kind: filters.kind,
                status: filters.status,
            },
            page,
            limit,
        )
        .await?;
    Ok(paginated(documents, total, page, limit))
}

#[utoipa::path(
    get,
    path = "/api/v1/ledger/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document returned", body = ledger_document::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "ledger"
)]
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ledger_document::Model>>, ServiceError> {
    Ok(ok(state.services.invoicing.get(id).await?))
}

/// Cross-check every purchase, order and wage payment against its document
#[utoipa::path(
    get,
    path = "/api/v1/ledger/reconciliation",
    responses(
        (status = 200, description = "Reconciliation report", body = ReconciliationReport)
    ),
    security(("bearer_auth" = [])),
    tag = "ledger"
)]
pub async fn reconcile(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ReconciliationReport>>, ServiceError> {
    Ok(ok(state.services.invoicing.reconcile().await?))
}
