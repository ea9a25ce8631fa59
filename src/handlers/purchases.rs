use crate::{
    auth::AuthUser,
    entities::{purchase_record, ItemCategory},
    errors::ServiceError,
    handlers::common::{created, ok, page_window, paginated},
    services::purchases::{NewPurchase, PurchaseFilter, PurchaseOutcome},
    ApiResponse, AppState, ListQuery, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PurchaseFilters {
    pub category: Option<ItemCategory>,
    pub vendor: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/purchases", get(list_purchases).post(record_purchase))
        .route("/purchases/:id", get(get_purchase))
}

/// Record stock bought from a vendor
#[utoipa::path(
    post,
    path = "/api/v1/purchases",
    request_body = NewPurchase,
    responses(
        (status = 201, description = "Purchase recorded, stock increased and expense issued", body = PurchaseOutcome),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "purchases"
)]
pub async fn record_purchase(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewPurchase>,
) -> Result<(StatusCode, Json<ApiResponse<PurchaseOutcome>>), ServiceError> {
    let outcome = state.services.purchases.record_purchase(payload).await?;
    info!(purchase_id = %outcome.purchase.id, user_id = %user.user_id, "Purchase recorded via API");
    Ok(created(outcome))
}

#[utoipa::path(
    get,
    path = "/api/v1/purchases",
    params(PurchaseFilters, ListQuery),
    responses(
        (status = 200, description = "Purchases, newest first", body = [purchase_record::Model])
    ),
    security(("bearer_auth" = [])),
    tag = "purchases"
)]
pub async fn list_purchases(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filters): Query<PurchaseFilters>,
) -> Result<Json<ApiResponse<PaginatedResponse<purchase_record::Model>>>, ServiceError> {
    let (page, limit) = page_window(&state, &query);
    let (records, total) = state
        .services
        .purchases
        .list(
            PurchaseFilter {
                category: filters.category,
                vendor: filters.vendor,
            },
            page,
            limit,
        )
        .await?;
    Ok(paginated(records, total, page, limit))
}

#[utoipa::path(
    get,
    path = "/api/v1/purchases/{id}",
    params(("id" = Uuid, Path, description = "Purchase ID")),
    responses(
        (status = 200, description = "Purchase returned", body = purchase_record::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "purchases"
)]
pub async fn get_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<purchase_record::Model>>, ServiceError> {
    Ok(ok(state.services.purchases.get(id).await?))
}
