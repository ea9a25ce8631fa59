use crate::{ApiResponse, AppState, ListQuery, PaginatedResponse};
use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Standard created response
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Standard success response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Page and page size for a list request, bounded by configuration
pub fn page_window(state: &AppState, query: &ListQuery) -> (u64, u64) {
    query.window(
        state.config.api_default_page_size,
        state.config.api_max_page_size,
    )
}

pub fn paginated<T: Serialize>(
    items: Vec<T>,
    total: u64,
    page: u64,
    limit: u64,
) -> Json<ApiResponse<PaginatedResponse<T>>> {
    Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    )))
}
