mod common;

use chrono::NaiveDate;
use common::TestApp;
use henhouse_api::{
    entities::ItemCategory,
    errors::ServiceError,
    services::{purchases::NewPurchase, usage::NewUsage},
};
use proptest::prelude::*;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
enum StockOp {
    Purchase(u32),
    Use(u32),
    Adjust(i32),
}

fn stock_op() -> impl Strategy<Value = StockOp> {
    prop_oneof![
        (1u32..=50).prop_map(StockOp::Purchase),
        (1u32..=60).prop_map(StockOp::Use),
        (-40i32..=40)
            .prop_filter("adjustments are non-zero", |d| *d != 0)
            .prop_map(StockOp::Adjust),
    ]
}

fn on(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
}

/// Applies `ops` to a fresh farm and checks the books after every step.
async fn run_ops(ops: Vec<StockOp>) {
    let app = TestApp::new().await;
    let services = app.services();
    let mut expected = Decimal::ZERO;
    let mut item_id = None;

    for op in ops {
        let result = match op {
            StockOp::Purchase(qty) => services
                .purchases
                .record_purchase(NewPurchase {
                    vendor: "Sri Lakshmi Feeds".to_string(),
                    category: ItemCategory::Feed,
                    item_name: "Layer Mash".to_string(),
                    unit: "kg".to_string(),
                    quantity: Decimal::from(qty),
                    unit_price: Decimal::from(32),
                    purchase_date: on(1),
                    expiry_date: None,
                    notes: None,
                })
                .await
                .map(|outcome| (Decimal::from(qty), outcome.item.id)),
            StockOp::Use(qty) => services
                .usage
                .record_usage(NewUsage {
                    category: ItemCategory::Feed,
                    item_name: "Layer Mash".to_string(),
                    quantity: Decimal::from(qty),
                    usage_date: on(2),
                    notes: None,
                })
                .await
                .map(|outcome| (-Decimal::from(qty), outcome.item.id)),
            StockOp::Adjust(delta) => match item_id {
                Some(id) => services
                    .inventory
                    .adjust(id, Decimal::from(delta), "stock count".to_string())
                    .await
                    .map(|item| (Decimal::from(delta), item.id)),
                None => continue,
            },
        };

        match result {
            Ok((delta, id)) => {
                expected += delta;
                item_id = Some(id);
            }
            Err(ServiceError::InsufficientStock(_)) | Err(ServiceError::NotFound(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }

        if let Some(id) = item_id {
            let item = services.inventory.get(id).await.unwrap();
            assert!(item.total_in_stock >= Decimal::ZERO);
            assert_eq!(item.total_in_stock, expected);
            assert_eq!(app.ledger_sum(id).await, expected);
        }
    }

    let report = services.invoicing.reconcile().await.unwrap();
    assert!(report.balanced, "{:?}", report);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn stock_always_matches_its_ledger(ops in prop::collection::vec(stock_op(), 1..20)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(run_ops(ops));
    }
}
