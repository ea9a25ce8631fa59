use crate::{
    auth::AuthUser,
    entities::{usage_record, ItemCategory},
    errors::ServiceError,
    handlers::common::{created, ok, page_window, paginated},
    services::usage::{NewUsage, UsageFilter, UsageOutcome},
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
pub struct UsageFilters {
    pub category: Option<ItemCategory>,
    pub item_id: Option<Uuid>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/usage", get(list_usage).post(record_usage))
        .route("/usage/:id", get(get_usage))
}

/// Take feed or medicine out of stock
#[utoipa::path(
    post,
    path = "/api/v1/usage",
    request_body = NewUsage,
    responses(
        (status = 201, description = "Usage recorded", body = UsageOutcome),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown item", body = crate::errors::ErrorResponse),
        (status = 422, description = "Not enough stock", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "usage"
)]
pub async fn record_usage(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewUsage>,
) -> Result<(StatusCode, Json<ApiResponse<UsageOutcome>>), ServiceError> {
    let outcome = state.services.usage.record_usage(payload).await?;
    info!(usage_id = %outcome.usage.id, user_id = %user.user_id, "Usage recorded via API");
    Ok(created(outcome))
}

#[utoipa::path(
    get,
    path = "/api/v1/usage",
    params(UsageFilters, ListQuery),
    responses(
        (status = 200, description = "Usage records, newest first", body = [usage_record::Model])
    ),
    security(("bearer_auth" = [])),
    tag = "usage"
)]
pub async fn list_usage(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filters): Query<UsageFilters>,
) -> Result<Json<ApiResponse<PaginatedResponse<usage_record::Model>>>, ServiceError> {
    let (page, limit) = page_window(&state, &query);
    let (records, total) = state
        .services
        .usage
        .list(
            UsageFilter {
                category: filters.category,
                item_id: filters.item_id,
            },
            page,
            limit,
        )
        .await?;
    Ok(paginated(records, total, page, limit))
}

#[utoipa::path(
    get,
    path = "/api/v1/usage/{id}",
    params(("id" = Uuid, Path, description = "Usage record ID")),
    responses(
        (status = 200, description = "Usage record returned", body = usage_record::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "usage"
)]
pub async fn get_usage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<usage_record::Model>>, ServiceError> {
    Ok(ok(state.services.usage.get(id).await?))
}
