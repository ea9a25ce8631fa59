use crate::{
    auth::AuthUser,
    entities::{inventory_item, stock_movement, ItemCategory},
    errors::ServiceError,
    handlers::common::{created, ok, page_window, paginated},
    services::inventory::{InventoryFilter, InventoryItemPatch, NewInventoryItem},
    ApiResponse, AppState, ListQuery, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct InventoryFilters {
    pub category: Option<ItemCategory>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInventoryRequest {
    /// Version the client last read
    pub version: i32,
    #[serde(flatten)]
    pub changes: InventoryItemPatch,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustInventoryRequest {
    /// Signed change, negative to write stock off
    pub delta: Decimal,
    pub reason: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_inventory).post(create_inventory))
        .route("/inventory/:id", get(get_inventory).patch(update_inventory))
        .route("/inventory/:id/adjust", post(adjust_inventory))
        .route("/inventory/:id/movements", get(list_movements))
}

/// List inventory items, optionally by category
#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    params(InventoryFilters, ListQuery),
    responses(
        (status = 200, description = "Inventory list returned", body = [inventory_item::Model]),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filters): Query<InventoryFilters>,
) -> Result<Json<ApiResponse<PaginatedResponse<inventory_item::Model>>>, ServiceError> {
    let (page, limit) = page_window(&state, &query);
    let (items, total) = state
        .services
        .inventory
        .list(
            InventoryFilter {
                category: filters.category,
            },
            page,
            limit,
        )
        .await?;
    Ok(paginated(items, total, page, limit))
}

/// Create a new inventory item with optional opening stock
#[utoipa::path(
    post,
    path = "/api/v1/inventory",
    request_body = NewInventoryItem,
    responses(
        (status = 201, description = "Inventory item created", body = inventory_item::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Item already exists", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn create_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewInventoryItem>,
) -> Result<(StatusCode, Json<ApiResponse<inventory_item::Model>>), ServiceError> {
    let item = state.services.inventory.create(payload).await?;
    info!(item_id = %item.id, user_id = %user.user_id, "Inventory item created via API");
    Ok(created(item))
}

/// Get a specific inventory item
#[utoipa::path(
    get,
    path = "/api/v1/inventory/{id}",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    responses(
        (status = 200, description = "Inventory item returned", body = inventory_item::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn get_inventory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<inventory_item::Model>>, ServiceError> {
    Ok(ok(state.services.inventory.get(id).await?))
}

/// Edit an item's descriptive fields
#[utoipa::path(
    patch,
    path = "/api/v1/inventory/{id}",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    request_body = UpdateInventoryRequest,
    responses(
        (status = 200, description = "Inventory item updated", body = inventory_item::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Item changed since it was read", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn update_inventory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInventoryRequest>,
) -> Result<Json<ApiResponse<inventory_item::Model>>, ServiceError> {
    let item = state
        .services
        .inventory
        .set(id, payload.changes, payload.version)
        .await?;
    Ok(ok(item))
}

/// Correct stock after a physical count
#[utoipa::path(
    post,
    path = "/api/v1/inventory/{id}/adjust",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    request_body = AdjustInventoryRequest,
    responses(
        (status = 200, description = "Stock adjusted", body = inventory_item::Model),
        (status = 422, description = "Adjustment would make stock negative", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn adjust_inventory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: AuthUser,
    Json(payload): Json<AdjustInventoryRequest>,
) -> Result<Json<ApiResponse<inventory_item::Model>>, ServiceError> {
    let item = state
        .services
        .inventory
        .adjust(id, payload.delta, payload.reason)
        .await?;
    info!(item_id = %id, user_id = %user.user_id, delta = %payload.delta, "Stock adjusted via API");
    Ok(ok(item))
}

/// The movement ledger of one item
#[utoipa::path(
    get,
    path = "/api/v1/inventory/{id}/movements",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    responses(
        (status = 200, description = "Movements, oldest first", body = [stock_movement::Model]),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<stock_movement::Model>>>, ServiceError> {
    Ok(ok(state.services.inventory.movements(id).await?))
}
