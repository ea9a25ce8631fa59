mod common;

use assert_matches::assert_matches;
use common::TestApp;
use henhouse_api::{
    entities::{DocumentKind, DocumentStatus, ItemCategory, MovementKind, OrderStatus, SourceType},
    errors::ServiceError,
    services::orders::NewOrder,
};
use rust_decimal_macros::dec;

fn order_for(breed: &str, quantity: i32) -> NewOrder {
    NewOrder {
        customer_name: "Lakshmi Stores".to_string(),
        customer_phone: Some("9800011122".to_string()),
        customer_address: None,
        breed: breed.to_string(),
        quantity,
        unit_price: None,
        order_date: None,
    }
}

async fn with_kadaknath(app: &TestApp) -> uuid::Uuid {
    let item = app
        .seed_item(ItemCategory::Chicken, "Kadaknath", "bird", dec!(200))
        .await;
    app.services()
        .pricing
        .set_price("Kadaknath", dec!(850))
        .await
        .unwrap();
    item.id
}

#[tokio::test]
async fn order_takes_catalogue_price_and_issues_invoice() {
    let app = TestApp::new().await;
    let item_id = with_kadaknath(&app).await;

    let outcome = app
        .services()
        .orders
        .place_order(order_for("Kadaknath", 12))
        .await
        .unwrap();

    let order = &outcome.order;
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.version, 1);
    assert_eq!(order.unit_price, dec!(850));
    assert_eq!(order.total_amount, dec!(10200));
    assert!(order.order_number.starts_with("ORD-"));

    assert_eq!(outcome.invoice.kind, DocumentKind::Invoice);
    assert_eq!(outcome.invoice.source_type, SourceType::Order);
    assert_eq!(outcome.invoice.source_id, order.id);
    assert_eq!(outcome.invoice.amount, dec!(10200));
    assert!(outcome.invoice.number.starts_with("INV-"));

    let item = app.services().inventory.get(item_id).await.unwrap();
    assert_eq!(item.total_in_stock, dec!(188));
    let movements = app.services().inventory.movements(item_id).await.unwrap();
    assert_eq!(movements.last().unwrap().kind, MovementKind::Order);
}

#[tokio::test]
async fn explicit_price_wins_and_missing_price_is_rejected() {
    let app = TestApp::new().await;
    app.seed_item(ItemCategory::Chicken, "Aseel", "bird", dec!(30))
        .await;

    let unpriced = app
        .services()
        .orders
        .place_order(order_for("Aseel", 2))
        .await;
    assert_matches!(unpriced, Err(ServiceError::ValidationError(_)));

    let priced = app
        .services()
        .orders
        .place_order(NewOrder {
            unit_price: Some(dec!(1100)),
            ..order_for("Aseel", 2)
        })
        .await
        .unwrap();
    assert_eq!(priced.order.total_amount, dec!(2200));

    let unknown_breed = app
        .services()
        .orders
        .place_order(NewOrder {
            unit_price: Some(dec!(500)),
            ..order_for("Vanaraja", 2)
        })
        .await;
    assert_matches!(unknown_breed, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn order_cannot_exceed_birds_on_hand() {
    let app = TestApp::new().await;
    let item_id = with_kadaknath(&app).await;

    let result = app
        .services()
        .orders
        .place_order(order_for("Kadaknath", 201))
        .await;
    assert_matches!(result, Err(ServiceError::InsufficientStock(_)));

    let (orders, total) = app
        .services()
        .orders
        .list(Default::default(), 1, 20)
        .await
        .unwrap();
    assert!(orders.is_empty());
    assert_eq!(total, 0);
    let (documents, _) = app
        .services()
        .invoicing
        .list(Default::default(), 1, 20)
        .await
        .unwrap();
    assert!(documents.is_empty());
    assert_eq!(app.ledger_sum(item_id).await, dec!(200));
}

#[tokio::test]
async fn order_walks_the_full_lifecycle() {
    let app = TestApp::new().await;
    with_kadaknath(&app).await;
    let orders = &app.services().orders;

    let order = orders
        .place_order(order_for("Kadaknath", 5))
        .await
        .unwrap()
        .order;

    let mut version = order.version;
    for status in [
        OrderStatus::Approved,
        OrderStatus::Packed,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ] {
        let updated = orders
            .update_status(order.id, status, Some(version), None)
            .await
            .unwrap();
        assert_eq!(updated.status, status);
        assert_eq!(updated.version, version + 1);
        version = updated.version;
    }

    let history = orders.history(order.id).await.unwrap();
    let trail: Vec<_> = history.iter().map(|c| (c.from_status, c.to_status)).collect();
    assert_eq!(
        trail,
        vec![
            (None, OrderStatus::Pending),
            (Some(OrderStatus::Pending), OrderStatus::Approved),
            (Some(OrderStatus::Approved), OrderStatus::Packed),
            (Some(OrderStatus::Packed), OrderStatus::OutForDelivery),
            (Some(OrderStatus::OutForDelivery), OrderStatus::Delivered),
        ]
    );

    let late_cancel = orders.cancel(order.id, None, None).await;
    assert_matches!(late_cancel, Err(ServiceError::InvalidStatus(_)));
}

#[tokio::test]
async fn skipping_a_step_is_rejected() {
    let app = TestApp::new().await;
    with_kadaknath(&app).await;
    let orders = &app.services().orders;

    let order = orders
        .place_order(order_for("Kadaknath", 5))
        .await
        .unwrap()
        .order;

    let skipped = orders
        .update_status(order.id, OrderStatus::Delivered, None, None)
        .await;
    assert_matches!(skipped, Err(ServiceError::InvalidStatus(_)));
    assert_eq!(orders.get(order.id).await.unwrap().status, OrderStatus::Pending);
}

#[tokio::test]
async fn cancelling_restores_birds_and_voids_invoice_once() {
    let app = TestApp::new().await;
    let item_id = with_kadaknath(&app).await;
    let orders = &app.services().orders;

    let placed = orders
        .place_order(order_for("Kadaknath", 40))
        .await
        .unwrap();
    orders
        .update_status(placed.order.id, OrderStatus::Approved, None, None)
        .await
        .unwrap();

    let cancelled = orders
        .cancel(placed.order.id, None, Some("customer changed their mind".to_string()))
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let item = app.services().inventory.get(item_id).await.unwrap();
    assert_eq!(item.total_in_stock, dec!(200));
    let invoice = app.services().invoicing.get(placed.invoice.id).await.unwrap();
    assert_eq!(invoice.status, DocumentStatus::Void);
    assert!(invoice.voided_at.is_some());

    // a second cancel changes nothing
    let again = orders.cancel(placed.order.id, None, None).await.unwrap();
    assert_eq!(again.version, cancelled.version);
    assert_eq!(app.ledger_sum(item_id).await, dec!(200));
    let restores = app
        .services()
        .inventory
        .movements(item_id)
        .await
        .unwrap()
        .into_iter()
        .filter(|m| m.kind == MovementKind::OrderCancelled)
        .count();
    assert_eq!(restores, 1);

    let report = app.services().invoicing.reconcile().await.unwrap();
    assert!(report.balanced, "{:?}", report);
}

#[tokio::test]
async fn stale_version_loses() {
    let app = TestApp::new().await;
    with_kadaknath(&app).await;
    let orders = &app.services().orders;

    let order = orders
        .place_order(order_for("Kadaknath", 3))
        .await
        .unwrap()
        .order;
    orders
        .update_status(order.id, OrderStatus::Approved, Some(order.version), None)
        .await
        .unwrap();

    let stale = orders
        .update_status(order.id, OrderStatus::Packed, Some(order.version), None)
        .await;
    assert_matches!(stale, Err(ServiceError::ConcurrentModification(id)) if id == order.id);
    assert_eq!(orders.get(order.id).await.unwrap().status, OrderStatus::Approved);
}

#[tokio::test]
async fn books_balance_after_mixed_activity() {
    let app = TestApp::new().await;
    with_kadaknath(&app).await;
    let orders = &app.services().orders;

    let kept = orders
        .place_order(order_for("Kadaknath", 10))
        .await
        .unwrap()
        .order;
    let dropped = orders
        .place_order(order_for("Kadaknath", 7))
        .await
        .unwrap()
        .order;
    orders
        .update_status(kept.id, OrderStatus::Approved, None, None)
        .await
        .unwrap();
    orders.cancel(dropped.id, None, None).await.unwrap();

    let report = app.services().invoicing.reconcile().await.unwrap();
    assert!(report.balanced, "{:?}", report);
    assert!(report.missing_documents.is_empty());
    assert!(report.status_mismatches.is_empty());
    assert!(report.stock_drift.is_empty());
    assert_eq!(report.checked_documents, 2);
}
