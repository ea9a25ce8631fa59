//! Henhouse API
//!
//! Backend for a small poultry farm: feed, medicine and chicken stock, purchases,
//! usage, customer orders, invoices and expenses, staff attendance and payroll.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer};
use utoipa::{IntoParams, ToSchema};

use crate::auth::AuthRouterExt;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub auth: Arc<auth::AuthService>,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Self {
        let auth = Arc::new(auth::AuthService::new(
            auth::AuthConfig::from(&config),
            db.clone(),
        ));
        let services = handlers::AppServices::new(db.clone(), event_sender.clone(), &config);
        Self {
            db,
            config,
            event_sender,
            auth,
            services,
        }
    }
}

// Common query parameters for list endpoints
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListQuery {
    /// 1-based page number
    pub page: Option<u64>,
    /// Page size; the configured default when absent
    pub limit: Option<u64>,
}

impl ListQuery {
    /// Page and page size, clamped to `1..` and `1..=max_limit`
    pub fn window(&self, default_limit: u64, max_limit: u64) -> (u64, u64) {
        let max_limit = max_limit.max(1);
        (
            self.page.unwrap_or(1).max(1),
            self.limit.unwrap_or(default_limit).clamp(1, max_limit),
        )
    }
}

// Common response wrappers
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Every `/api/v1` route. Farm resources require a bearer token; health and
/// sign-in stay public.
pub fn api_v1_routes(auth: Arc<auth::AuthService>) -> Router<AppState> {
    let farm = Router::new()
        .merge(handlers::inventory::routes())
        .merge(handlers::alerts::routes())
        .merge(handlers::purchases::routes())
        .merge(handlers::usage::routes())
        .merge(handlers::orders::routes())
        .merge(handlers::ledger::routes())
        .merge(handlers::employees::routes())
        .merge(handlers::prices::routes())
        .merge(handlers::reports::routes())
        .with_auth(auth.clone());

    Router::new()
        .merge(farm)
        .merge(handlers::health::routes())
        .nest("/auth", auth::auth_routes(auth.clone()).with_state(auth))
}

/// Builds the CORS layer from configuration. Without explicit origins and
/// without permission to allow any, only same-origin requests succeed.
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!("Using permissive CORS");
        CorsLayer::permissive()
    } else {
        ::tracing::warn!("No CORS origins configured; cross-origin requests will be refused");
        CorsLayer::new()
    }
}

/// The complete application: API, Swagger UI and the middleware stack
pub fn app_router(state: AppState) -> Router {
    let timeout = state.config.request_timeout();
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(|| async { (StatusCode::OK, "henhouse-api up") }))
        .nest("/api/v1", api_v1_routes(state.auth.clone()))
        .merge(openapi::swagger_ui())
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TimeoutLayer::new(timeout))
        .layer(crate::tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
}
