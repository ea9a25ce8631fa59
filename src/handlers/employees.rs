use crate::{
    auth::AuthUser,
    entities::{attendance, employee},
    errors::ServiceError,
    handlers::common::{created, ok},
    services::payroll::{AttendanceMark, NewEmployee, PayrollOutcome, PayrollSummary},
    ApiResponse, AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EmployeeFilters {
    pub active: Option<bool>,
}

/// Pay period as `YYYY-MM`
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct MonthQuery {
    pub month: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/:id", get(get_employee))
        .route("/employees/:id/deactivate", post(deactivate_employee))
        .route(
            "/employees/:id/attendance",
            get(list_attendance).put(mark_attendance),
        )
        .route("/employees/:id/payroll", get(compute_payroll))
        .route("/employees/:id/payroll/pay", post(pay_wages))
}

#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee added", body = employee::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    Json(payload): Json<NewEmployee>,
) -> Result<(StatusCode, Json<ApiResponse<employee::Model>>), ServiceError> {
    Ok(created(state.services.payroll.create_employee(payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeFilters),
    responses(
        (status = 200, description = "Employees by name", body = [employee::Model])
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn list_employees(
    State(state): State<AppState>,
    Query(filters): Query<EmployeeFilters>,
) -> Result<Json<ApiResponse<Vec<employee::Model>>>, ServiceError> {
    Ok(ok(state.services.payroll.list_employees(filters.active).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee returned", body = employee::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<employee::Model>>, ServiceError> {
    Ok(ok(state.services.payroll.get_employee(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/employees/{id}/deactivate",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deactivated", body = employee::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn deactivate_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<employee::Model>>, ServiceError> {
    Ok(ok(state.services.payroll.deactivate_employee(id).await?))
}

/// Mark one day's attendance; marking the same day again replaces it
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}/attendance",
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = AttendanceMark,
    responses(
        (status = 200, description = "Attendance stored", body = attendance::Model),
        (status = 400, description = "Employee inactive or date before joining", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn mark_attendance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttendanceMark>,
) -> Result<Json<ApiResponse<attendance::Model>>, ServiceError> {
    Ok(ok(state.services.payroll.mark_attendance(id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}/attendance",
    params(("id" = Uuid, Path, description = "Employee ID"), MonthQuery),
    responses(
        (status = 200, description = "Attendance for the month", body = [attendance::Model])
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn list_attendance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<ApiResponse<Vec<attendance::Model>>>, ServiceError> {
    Ok(ok(state.services.payroll.attendance(id, &query.month).await?))
}

/// Days worked and wages due for a month
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}/payroll",
    params(("id" = Uuid, Path, description = "Employee ID"), MonthQuery),
    responses(
        (status = 200, description = "Payroll summary", body = PayrollSummary)
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn compute_payroll(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<ApiResponse<PayrollSummary>>, ServiceError> {
    Ok(ok(state.services.payroll.compute(id, &query.month).await?))
}

/// Pay a month's wages and book the expense
#[utoipa::path(
    post,
    path = "/api/v1/employees/{id}/payroll/pay",
    params(("id" = Uuid, Path, description = "Employee ID"), MonthQuery),
    responses(
        (status = 201, description = "Wages paid", body = PayrollOutcome),
        (status = 400, description = "Inactive employee or nothing worked", body = crate::errors::ErrorResponse),
        (status = 409, description = "Month already paid", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "employees"
)]
pub async fn pay_wages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: AuthUser,
    Query(query): Query<MonthQuery>,
) -> Result<(StatusCode, Json<ApiResponse<PayrollOutcome>>), ServiceError> {
    let outcome = state.services.payroll.pay(id, &query.month).await?;
    info!(
        employee_id = %id,
        month = %query.month,
        user_id = %user.user_id,
        "Wages paid via API"
    );
    Ok(created(outcome))
}
