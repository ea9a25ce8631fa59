use crate::{
    entities::chicken_price, errors::ServiceError, handlers::common::ok,
    services::pricing::SetPrice, ApiResponse, AppState,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/prices", get(list_prices).put(set_price))
        .route("/prices/:breed", get(get_price))
}

#[utoipa::path(
    get,
    path = "/api/v1/prices",
    responses(
        (status = 200, description = "Price catalogue by breed", body = [chicken_price::Model])
    ),
    security(("bearer_auth" = [])),
    tag = "prices"
)]
pub async fn list_prices(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<chicken_price::Model>>>, ServiceError> {
    Ok(ok(state.services.pricing.list().await?))
}

/// Create or replace the price of a breed
#[utoipa::path(
    put,
    path = "/api/v1/prices",
    request_body = SetPrice,
    responses(
        (status = 200, description = "Price stored", body = chicken_price::Model),
        (status = 400, description = "Invalid price", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "prices"
)]
pub async fn set_price(
    State(state): State<AppState>,
    Json(payload): Json<SetPrice>,
) -> Result<Json<ApiResponse<chicken_price::Model>>, ServiceError> {
    let price = state
        .services
        .pricing
        .set_price(&payload.breed, payload.price_per_unit)
        .await?;
    Ok(ok(price))
}

#[utoipa::path(
    get,
    path = "/api/v1/prices/{breed}",
    params(("breed" = String, Path, description = "Breed name")),
    responses(
        (status = 200, description = "Price returned", body = chicken_price::Model),
        (status = 404, description = "No price set", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "prices"
)]
pub async fn get_price(
    State(state): State<AppState>,
    Path(breed): Path<String>,
) -> Result<Json<ApiResponse<chicken_price::Model>>, ServiceError> {
    Ok(ok(state.services.pricing.get_price(&breed).await?))
}
