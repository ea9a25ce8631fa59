#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use henhouse_api::{
    app_router,
    auth::{LoginCredentials, SignUpRequest},
    config::AppConfig,
    db,
    entities::{inventory_item, ItemCategory},
    events::{self, EventHandler, EventSender, LoggingEventHandler},
    handlers::AppServices,
    services::inventory::NewInventoryItem,
    AppState,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

pub const TEST_SECRET: &str =
    "test_secret_key_for_henhouse_integration_tests_only_do_not_use_in_production_0123456789";
pub const TEST_EMAIL: &str = "keeper@henhouse.test";
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Application state and router backed by a fresh in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    token: String,
    _event_task: tokio::task::JoinHandle<()>,
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::new(
        "sqlite::memory:".to_string(),
        TEST_SECRET.to_string(),
        3600,
        "127.0.0.1".to_string(),
        18_080,
        "test".to_string(),
    );
    cfg.cors_allow_any_origin = true;
    cfg
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(cfg: AppConfig) -> Self {
        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(1024);
        let handlers: Vec<Arc<dyn EventHandler>> = vec![Arc::new(LoggingEventHandler)];
        let event_task = tokio::spawn(events::process_events(event_rx, handlers));

        let state = AppState::new(Arc::new(pool), cfg, EventSender::new(event_tx));

        state
            .auth
            .sign_up(SignUpRequest {
                name: "Farm Keeper".to_string(),
                email: TEST_EMAIL.to_string(),
                password: TEST_PASSWORD.to_string(),
            })
            .await
            .expect("seed test account");
        let token = state
            .auth
            .sign_in(LoginCredentials {
                email: TEST_EMAIL.to_string(),
                password: TEST_PASSWORD.to_string(),
            })
            .await
            .expect("sign in test account")
            .access_token;

        Self {
            router: app_router(state.clone()),
            state,
            token,
            _event_task: event_task,
        }
    }

    pub fn services(&self) -> &AppServices {
        &self.state.services
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Sends a request through the full middleware stack
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json).expect("serialize request body"))
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("router error during test request")
    }

    /// Authenticated JSON request returning the status and parsed body
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let bearer = format!("Bearer {}", self.token);
        let response = self
            .send(method, uri, body, &[("authorization", bearer.as_str())])
            .await;
        read_json(response).await
    }

    pub async fn seed_item(
        &self,
        category: ItemCategory,
        name: &str,
        unit: &str,
        opening_stock: Decimal,
    ) -> inventory_item::Model {
        self.services()
            .inventory
            .create(NewInventoryItem {
                category,
                name: name.to_string(),
                unit: unit.to_string(),
                opening_stock,
                reorder_threshold: None,
                expiry_date: None,
            })
            .await
            .expect("seed inventory item")
    }

    /// Sum of every movement recorded for an item
    pub async fn ledger_sum(&self, item_id: uuid::Uuid) -> Decimal {
        self.services()
            .inventory
            .movements(item_id)
            .await
            .expect("load movements")
            .iter()
            .map(|m| m.delta)
            .sum()
    }
}

pub async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}
