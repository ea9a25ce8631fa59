use crate::{
    errors::ServiceError, handlers::common::ok, services::alerts::StockAlerts, ApiResponse,
    AppState,
};
use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;

pub fn routes() -> Router<AppState> {
    Router::new().route("/alerts", get(list_alerts))
}

/// Items below their reorder threshold and items close to expiry
#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    responses(
        (status = 200, description = "Current stock alerts", body = StockAlerts),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "alerts"
)]
pub async fn list_alerts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StockAlerts>>, ServiceError> {
    let alerts = state.services.alerts.scan(Utc::now().date_naive()).await?;
    Ok(ok(alerts))
}
