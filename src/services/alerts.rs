use crate::{
    config::AppConfig,
    entities::inventory_item::{self, Entity as InventoryItemEntity, ItemCategory},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::NaiveDate;
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

/// Thresholds shared by every alert check
#[derive(Debug, Clone, Copy)]
pub struct AlertSettings {
    pub low_stock_threshold: Decimal,
    pub expiry_warning_days: i64,
}

impl From<&AppConfig> for AlertSettings {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            low_stock_threshold: Decimal::from(cfg.low_stock_threshold),
            expiry_warning_days: i64::from(cfg.expiry_warning_days),
        }
    }
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            low_stock_threshold: Decimal::from(50),
            expiry_warning_days: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LowStockAlert {
    pub item_id: Uuid,
    pub category: ItemCategory,
    pub name: String,
    pub unit: String,
    pub total_in_stock: Decimal,
    pub threshold: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExpiryAlert {
    pub item_id: Uuid,
    pub category: ItemCategory,
    pub name: String,
    pub expiry_date: NaiveDate,
    /// Negative once the item has expired
    pub days_remaining: i64,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct StockAlerts {
    pub low_stock: Vec<LowStockAlert>,
    pub expiring: Vec<ExpiryAlert>,
}

/// True only on the change that takes the balance from at-or-above the
/// threshold to below it.
pub fn crossed_below(previous: Decimal, current: Decimal, threshold: Decimal) -> bool {
    previous >= threshold && current < threshold
}

#[derive(Clone)]
pub struct AlertService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
    settings: AlertSettings,
}

impl AlertService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: EventSender,
        settings: AlertSettings,
    ) -> Self {
        Self {
            db,
            event_sender,
            settings,
        }
    }

    pub fn settings(&self) -> AlertSettings {
        self.settings
    }

    pub fn threshold_for(&self, item: &inventory_item::Model) -> Decimal {
        item.reorder_threshold
            .unwrap_or(self.settings.low_stock_threshold)
    }

    pub fn is_low(&self, item: &inventory_item::Model) -> bool {
        item.total_in_stock < self.threshold_for(item)
    }

    fn expiry_alert(&self, item: &inventory_item::Model, today: NaiveDate) -> Option<ExpiryAlert> {
        let expiry_date = item.expiry_date?;
        if item.total_in_stock <= Decimal::ZERO {
            return None;
        }
        let days_remaining = (expiry_date - today).num_days();
        (days_remaining <= self.settings.expiry_warning_days).then(|| ExpiryAlert {
            item_id: item.id,
            category: item.category,
            name: item.name.clone(),
            expiry_date,
            days_remaining,
        })
    }

    /// Every item that is currently low or close to expiry
    #[instrument(skip(self))]
    pub async fn scan(&self, today: NaiveDate) -> Result<StockAlerts, ServiceError> {
        let items = InventoryItemEntity::find()
            .order_by_asc(inventory_item::Column::Name)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut alerts = StockAlerts::default();
        for item in &items {
            if self.is_low(item) {
                alerts.low_stock.push(LowStockAlert {
                    item_id: item.id,
                    category: item.category,
                    name: item.name.clone(),
                    unit: item.unit.clone(),
                    total_in_stock: item.total_in_stock,
                    threshold: self.threshold_for(item),
                });
            }
            if let Some(alert) = self.expiry_alert(item, today) {
                alerts.expiring.push(alert);
            }
        }
        alerts.expiring.sort_by_key(|alert| alert.expiry_date);
        Ok(alerts)
    }

    /// Raises a one-shot warning when a decrement takes `item` below its threshold.
    /// Returns whether a warning was raised.
    pub async fn check_after_decrement(
        &self,
        item: &inventory_item::Model,
        previous_balance: Decimal,
    ) -> bool {
        let threshold = self.threshold_for(item);
        if !crossed_below(previous_balance, item.total_in_stock, threshold) {
            return false;
        }

        counter!("henhouse_alerts.low_stock", 1);
        self.event_sender
            .send_or_log(Event::LowStockWarning {
                item_id: item.id,
                item_name: item.name.clone(),
                balance: item.total_in_stock,
                threshold,
            })
            .await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tokio::sync::mpsc;

    fn item(
        stock: Decimal,
        threshold: Option<Decimal>,
        expiry: Option<NaiveDate>,
    ) -> inventory_item::Model {
        inventory_item::Model {
            id: Uuid::new_v4(),
            category: ItemCategory::Feed,
            name: "Layer Mash".into(),
            unit: "kg".into(),
            total_in_stock: stock,
            reorder_threshold: threshold,
            expiry_date: expiry,
            version: 1,
            created_at: Utc::now(),
            last_updated: Utc::now(),
        }
    }

    fn service() -> (AlertService, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(8);
        let svc = AlertService::new(
            Arc::new(DatabaseConnection::default()),
            EventSender::new(tx),
            AlertSettings::default(),
        );
        (svc, rx)
    }

    #[test]
    fn crossing_is_detected_once() {
        assert!(crossed_below(dec!(60), dec!(40), dec!(50)));
        assert!(crossed_below(dec!(50), dec!(49.5), dec!(50)));
        assert!(!crossed_below(dec!(40), dec!(30), dec!(50)));
        assert!(!crossed_below(dec!(100), dec!(50), dec!(50)));
    }

    #[test]
    fn item_threshold_overrides_default() {
        let (svc, _rx) = service();
        assert_eq!(svc.threshold_for(&item(dec!(10), None, None)), dec!(50));
        assert_eq!(svc.threshold_for(&item(dec!(10), Some(dec!(5)), None)), dec!(5));
        assert!(!svc.is_low(&item(dec!(10), Some(dec!(5)), None)));
    }

    #[test]
    fn expiry_window_includes_expired_stock() {
        let (svc, _rx) = service();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        let soon = item(dec!(5), None, NaiveDate::from_ymd_opt(2026, 11, 1));
        assert_eq!(svc.expiry_alert(&soon, today).unwrap().days_remaining, 14);

        let expired = item(dec!(5), None, NaiveDate::from_ymd_opt(2026, 10, 10));
        assert_eq!(svc.expiry_alert(&expired, today).unwrap().days_remaining, -8);

        let far = item(dec!(5), None, NaiveDate::from_ymd_opt(2027, 3, 1));
        assert!(svc.expiry_alert(&far, today).is_none());

        let empty = item(dec!(0), None, NaiveDate::from_ymd_opt(2026, 10, 20));
        assert!(svc.expiry_alert(&empty, today).is_none());
    }

    #[tokio::test]
    async fn warning_is_sent_only_on_crossing() {
        let (svc, mut rx) = service();
        assert!(svc.check_after_decrement(&item(dec!(40), None, None), dec!(100)).await);
        assert!(!svc.check_after_decrement(&item(dec!(30), None, None), dec!(40)).await);

        match rx.try_recv().unwrap() {
            Event::LowStockWarning { balance, threshold, .. } => {
                assert_eq!(balance, dec!(40));
                assert_eq!(threshold, dec!(50));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }
}
