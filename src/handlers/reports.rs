use crate::{
    errors::ServiceError, handlers::common::ok, services::reports::DashboardSummary, ApiResponse,
    AppState,
};
use axum::{extract::State, routing::get, Json, Router};

pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/dashboard", get(dashboard))
}

/// Stock, sales, expenses and alert counts at a glance
#[utoipa::path(
    get,
    path = "/api/v1/reports/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary)
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardSummary>>, ServiceError> {
    Ok(ok(state.services.reports.dashboard().await?))
}
