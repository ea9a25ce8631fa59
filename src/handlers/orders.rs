use crate::{
    auth::AuthUser,
    entities::{order, order_status_change, OrderStatus},
    errors::ServiceError,
    handlers::common::{created, ok, page_window, paginated},
    services::orders::{NewOrder, OrderFilter, OrderOutcome, StatusUpdate},
    ApiResponse, AppState, ListQuery, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct OrderFilters {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CancelOrderRequest {
    pub expected_version: Option<i32>,
    pub reason: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/status", put(update_order_status))
        .route("/orders/:id/cancel", post(cancel_order))
        .route("/orders/:id/history", get(order_history))
}

/// Place a chicken order
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = NewOrder,
    responses(
        (status = 201, description = "Order placed and invoiced", body = OrderOutcome),
        (status = 400, description = "Invalid request or no price known", body = crate::errors::ErrorResponse),
        (status = 404, description = "No stock kept for the breed", body = crate::errors::ErrorResponse),
        (status = 422, description = "Not enough birds", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewOrder>,
) -> Result<(StatusCode, Json<ApiResponse<OrderOutcome>>), ServiceError> {
    let outcome = state.services.orders.place_order(payload).await?;
    info!(
        order_id = %outcome.order.id,
        order_number = %outcome.order.order_number,
        user_id = %user.user_id,
        "Order placed via API"
    );
    Ok(created(outcome))
}

/// List orders, optionally by status
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(OrderFilters, ListQuery),
    responses(
        (status = 200, description = "Orders, newest first", body = [order::Model])
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filters): Query<OrderFilters>,
) -> Result<Json<ApiResponse<PaginatedResponse<order::Model>>>, ServiceError> {
    let (page, limit) = page_window(&state, &query);
    let (orders, total) = state
        .services
        .orders
        .list(
            OrderFilter {
                status: filters.status,
            },
            page,
            limit,
        )
        .await?;
    Ok(paginated(orders, total, page, limit))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order returned", body = order::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<order::Model>>, ServiceError> {
    Ok(ok(state.services.orders.get(id).await?))
}

/// Move an order to its next status
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Order updated", body = order::Model),
        (status = 400, description = "Transition not allowed", body = crate::errors::ErrorResponse),
        (status = 409, description = "Order changed since it was read", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: AuthUser,
    Json(payload): Json<StatusUpdate>,
) -> Result<Json<ApiResponse<order::Model>>, ServiceError> {
    let order = state
        .services
        .orders
        .update_status(id, payload.status, payload.expected_version, payload.note)
        .await?;
    info!(order_id = %id, status = %order.status, user_id = %user.user_id, "Order status set via API");
    Ok(ok(order))
}

/// Cancel an order, returning its birds to stock and voiding its invoice
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = CancelOrderRequest,
    responses(
        (status = 200, description = "Order cancelled", body = order::Model),
        (status = 400, description = "Order already delivered", body = crate::errors::ErrorResponse),
        (status = 409, description = "Order changed since it was read", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: AuthUser,
    payload: Option<Json<CancelOrderRequest>>,
) -> Result<Json<ApiResponse<order::Model>>, ServiceError> {
    let Json(request) = payload.unwrap_or_default();
    let order = state
        .services
        .orders
        .cancel(id, request.expected_version, request.reason)
        .await?;
    info!(order_id = %id, user_id = %user.user_id, "Order cancelled via API");
    Ok(ok(order))
}

/// Status changes of an order, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/history",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Status history", body = [order_status_change::Model]),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn order_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<order_status_change::Model>>>, ServiceError> {
    Ok(ok(state.services.orders.history(id).await?))
}
