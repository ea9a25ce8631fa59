mod common;

use axum::http::{Method, StatusCode};
use common::{read_json, TestApp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(text) => text.parse().unwrap(),
        other => other.to_string().parse().unwrap(),
    }
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new().await;

    let (status, body) = read_json(app.send(Method::GET, "/api/v1/health", None, &[]).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");

    let (status, body) = read_json(app.send(Method::GET, "/api/v1/status", None, &[]).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"]["status"], "up");
}

#[tokio::test]
async fn farm_routes_need_a_token() {
    let app = TestApp::new().await;

    let response = app.send(Method::GET, "/api/v1/inventory", None, &[]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(
            Method::GET,
            "/api/v1/inventory",
            None,
            &[("authorization", "Bearer not-a-token")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, body) = app.call(Method::GET, "/api/v1/auth/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], common::TEST_EMAIL);
}

#[tokio::test]
async fn sign_in_with_wrong_password_fails() {
    let app = TestApp::new().await;

    let (status, _) = read_json(
        app.send(
            Method::POST,
            "/api/v1/auth/sign-in",
            Some(json!({ "email": common::TEST_EMAIL, "password": "wrong-password-1" })),
            &[],
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn inventory_over_http() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/inventory",
            Some(json!({
                "category": "feed",
                "name": "Grower Pellets",
                "unit": "kg",
                "opening_stock": "120",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["success"], true);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(decimal(&body["data"]["total_in_stock"]), dec!(120));

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/inventory",
            Some(json!({
                "category": "feed",
                "name": "Grower Pellets",
                "unit": "kg",
                "opening_stock": "1",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let (status, body) = app.call(Method::GET, "/api/v1/inventory?category=feed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["id"], id.as_str());

    let (status, body) = app
        .call(Method::GET, &format!("/api/v1/inventory/{}/movements", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn overdrawn_usage_is_unprocessable_and_carries_request_id() {
    let app = TestApp::new().await;
    app.seed_item(
        henhouse_api::entities::ItemCategory::Medicine,
        "Coccidiostat",
        "g",
        dec!(200),
    )
    .await;

    let bearer = format!("Bearer {}", app.token());
    let response = app
        .send(
            Method::POST,
            "/api/v1/usage",
            Some(json!({
                "category": "medicine",
                "item_name": "Coccidiostat",
                "quantity": "250",
                "usage_date": "2026-10-18",
            })),
            &[
                ("authorization", bearer.as_str()),
                ("x-request-id", "coop-42"),
            ],
        )
        .await;
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "coop-42"
    );
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["request_id"], "coop-42");
    assert!(body["message"].as_str().unwrap().contains("Coccidiostat"));
}

#[tokio::test]
async fn generated_request_id_is_echoed() {
    let app = TestApp::new().await;

    let response = app.send(Method::GET, "/api/v1/health", None, &[]).await;
    let header = response.headers().get("x-request-id").unwrap();
    assert!(!header.to_str().unwrap().is_empty());
}

#[tokio::test]
async fn order_flow_over_http() {
    let app = TestApp::new().await;
    app.seed_item(
        henhouse_api::entities::ItemCategory::Chicken,
        "Giriraja",
        "bird",
        dec!(60),
    )
    .await;

    let (status, _) = app
        .call(
            Method::PUT,
            "/api/v1/prices",
            Some(json!({ "breed": "Giriraja", "price_per_unit": "400" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_name": "Hotel Annapurna",
                "breed": "Giriraja",
                "quantity": 15,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let order_id = body["data"]["order"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["order"]["status"], "pending");
    assert_eq!(decimal(&body["data"]["invoice"]["amount"]), dec!(6000));

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/api/v1/orders/{}/status", order_id),
            Some(json!({ "status": "delivered" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    let (status, body) = app
        .call(Method::POST, &format!("/api/v1/orders/{}/cancel", order_id), None)
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "cancelled");

    let (status, body) = app
        .call(Method::GET, &format!("/api/v1/orders/{}/history", order_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app
        .call(Method::GET, "/api/v1/ledger?status=void", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);

    let (status, body) = app
        .call(Method::GET, "/api/v1/ledger/reconciliation", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["balanced"], true);
}

#[tokio::test]
async fn dashboard_and_alerts() {
    let app = TestApp::new().await;
    app.seed_item(
        henhouse_api::entities::ItemCategory::Feed,
        "Layer Mash",
        "kg",
        dec!(10),
    )
    .await;

    let (status, body) = app.call(Method::GET, "/api/v1/reports/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["item_count"], 1);
    assert_eq!(body["data"]["low_stock_count"], 1);

    let (status, body) = app.call(Method::GET, "/api/v1/alerts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["low_stock"][0]["name"], "Layer Mash");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let (status, body) =
        read_json(app.send(Method::GET, "/api-docs/openapi.json", None, &[]).await).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/usage"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
}

#[tokio::test]
async fn oversized_amounts_are_bad_requests() {
    let app = TestApp::new().await;
    let birds = app
        .seed_item(
            henhouse_api::entities::ItemCategory::Chicken,
            "Kadaknath",
            "bird",
            dec!(50),
        )
        .await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/purchases",
            Some(json!({
                "vendor": "Sri Lakshmi Feeds",
                "category": "feed",
                "item_name": "Layer Mash",
                "unit": "kg",
                "quantity": "70000000000000000000",
                "unit_price": "10000000000",
                "purchase_date": "2026-10-18",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/purchases",
            Some(json!({
                "vendor": "Sri Lakshmi Feeds",
                "category": "feed",
                "item_name": "Layer Mash",
                "unit": "kg",
                "quantity": "900000",
                "unit_price": "9000000",
                "purchase_date": "2026-10-18",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_name": "Hotel Annapurna",
                "breed": "Kadaknath",
                "quantity": 20,
                "unit_price": "999999999999",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    let (status, body) = app
        .call(
            Method::PUT,
            "/api/v1/prices",
            Some(json!({ "breed": "Kadaknath", "price_per_unit": "1000000000000" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    let stock = app.services().inventory.get(birds.id).await.unwrap();
    assert_eq!(stock.total_in_stock, dec!(50));
    let (status, body) = app.call(Method::GET, "/api/v1/purchases", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 0);
}
