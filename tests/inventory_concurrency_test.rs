mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use common::TestApp;
use henhouse_api::{
    entities::{ItemCategory, MovementKind},
    errors::ServiceError,
    services::{
        inventory::{apply_stock_delta, StockChange},
        usage::NewUsage,
    },
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn usage(quantity: Decimal) -> NewUsage {
    NewUsage {
        category: ItemCategory::Feed,
        item_name: "Layer Mash".to_string(),
        quantity,
        usage_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        notes: None,
    }
}

// In-memory SQLite is pinned to one connection, so these transactions
// interleave at await points but never overlap. Overdraw protection comes from
// the guarded UPDATE in `apply_stock_delta`, covered directly by
// `guarded_update_ignores_the_callers_stale_balance`.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_usages_cannot_overdraw_stock() {
    let app = TestApp::new().await;
    let item = app
        .seed_item(ItemCategory::Feed, "Layer Mash", "kg", dec!(100))
        .await;

    let first = app.services().usage.clone();
    let second = app.services().usage.clone();
    let (a, b) = tokio::join!(
        tokio::spawn(async move { first.record_usage(usage(dec!(60))).await }),
        tokio::spawn(async move { second.record_usage(usage(dec!(60))).await }),
    );
    let results = [a.unwrap(), b.unwrap()];

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1, "exactly one 60 kg usage fits in 100 kg");
    let rejected = results.iter().find(|r| r.is_err()).unwrap();
    assert_matches!(rejected, Err(ServiceError::InsufficientStock(_)));

    let item = app.services().inventory.get(item.id).await.unwrap();
    assert_eq!(item.total_in_stock, dec!(40));
    assert_eq!(app.ledger_sum(item.id).await, dec!(40));

    let (records, total) = app
        .services()
        .usage
        .list(Default::default(), 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(records[0].quantity, dec!(60));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_small_usages_stop_at_zero() {
    let app = TestApp::new().await;
    let item = app
        .seed_item(ItemCategory::Feed, "Layer Mash", "kg", dec!(100))
        .await;

    let mut tasks = Vec::new();
    for _ in 0..15 {
        let svc = app.services().usage.clone();
        tasks.push(tokio::spawn(async move { svc.record_usage(usage(dec!(10))).await }));
    }

    let mut accepted = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(e) => assert_matches!(e, ServiceError::InsufficientStock(_)),
        }
    }

    assert_eq!(accepted, 10);
    let item = app.services().inventory.get(item.id).await.unwrap();
    assert_eq!(item.total_in_stock, Decimal::ZERO);
    assert_eq!(app.ledger_sum(item.id).await, Decimal::ZERO);
}

#[tokio::test]
async fn stale_version_is_rejected_on_edit() {
    let app = TestApp::new().await;
    let item = app
        .seed_item(ItemCategory::Medicine, "Vitamin B Complex", "ml", dec!(500))
        .await;

    let patch = henhouse_api::services::inventory::InventoryItemPatch {
        reorder_threshold: Some(dec!(100)),
        ..Default::default()
    };
    let updated = app
        .services()
        .inventory
        .set(item.id, patch.clone(), item.version)
        .await
        .unwrap();
    assert_eq!(updated.version, item.version + 1);
    assert_eq!(updated.reorder_threshold, Some(dec!(100)));

    let stale = app.services().inventory.set(item.id, patch, item.version).await;
    assert_matches!(stale, Err(ServiceError::ConcurrentModification(id)) if id == item.id);
}

#[tokio::test]
async fn guarded_update_ignores_the_callers_stale_balance() {
    let app = TestApp::new().await;
    let db = app.state.db.clone();
    let seen = app
        .seed_item(ItemCategory::Feed, "Layer Mash", "kg", dec!(100))
        .await;

    // another writer takes 70 kg after the caller read 100 kg
    app.services()
        .usage
        .record_usage(usage(dec!(70)))
        .await
        .unwrap();
    assert_eq!(seen.total_in_stock, dec!(100));

    let change = |delta| StockChange {
        item_id: seen.id,
        delta,
        kind: MovementKind::Adjustment,
        reference_type: None,
        reference_id: None,
        note: Some("decided from a stale read".to_string()),
    };

    let overdraw = apply_stock_delta(&*db, change(dec!(-60))).await;
    assert_matches!(
        overdraw,
        Err(ServiceError::InsufficientStock(msg)) if msg == "Layer Mash has 30 kg, requested 60"
    );
    assert_eq!(app.ledger_sum(seen.id).await, dec!(30));

    let applied = apply_stock_delta(&*db, change(dec!(-30))).await.unwrap();
    assert_eq!(applied.previous_balance, dec!(30));
    assert_eq!(applied.item.total_in_stock, Decimal::ZERO);
    assert_eq!(applied.movement.balance_after, Decimal::ZERO);
    assert_eq!(applied.item.version, seen.version + 2);
}
