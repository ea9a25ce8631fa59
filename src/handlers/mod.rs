pub mod alerts;
pub mod common;
pub mod employees;
pub mod health;
pub mod inventory;
pub mod ledger;
pub mod orders;
pub mod prices;
pub mod purchases;
pub mod reports;
pub mod usage;

use crate::{
    config::AppConfig,
    events::EventSender,
    services::{
        alerts::{AlertService, AlertSettings},
        inventory::InventoryService,
        invoicing::InvoicingService,
        orders::OrderService,
        payroll::PayrollService,
        pricing::PricingService,
        purchases::PurchaseService,
        reports::ReportService,
        usage::UsageService,
    },
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub alerts: Arc<AlertService>,
    pub inventory: Arc<InventoryService>,
    pub purchases: Arc<PurchaseService>,
    pub usage: Arc<UsageService>,
    pub orders: Arc<OrderService>,
    pub invoicing: Arc<InvoicingService>,
    pub payroll: Arc<PayrollService>,
    pub pricing: Arc<PricingService>,
    pub reports: Arc<ReportService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender, config: &AppConfig) -> Self {
        let currency = config.default_currency.clone();
        let alerts = Arc::new(AlertService::new(
            db.clone(),
            event_sender.clone(),
            AlertSettings::from(config),
        ));

        Self {
            inventory: Arc::new(InventoryService::new(
                db.clone(),
                event_sender.clone(),
                alerts.clone(),
            )),
            purchases: Arc::new(PurchaseService::new(
                db.clone(),
                event_sender.clone(),
                currency.clone(),
            )),
            usage: Arc::new(UsageService::new(
                db.clone(),
                event_sender.clone(),
                alerts.clone(),
            )),
            orders: Arc::new(OrderService::new(
                db.clone(),
                event_sender.clone(),
                alerts.clone(),
                currency.clone(),
            )),
            invoicing: Arc::new(InvoicingService::new(db.clone())),
            payroll: Arc::new(PayrollService::new(db.clone(), event_sender, currency)),
            pricing: Arc::new(PricingService::new(db.clone())),
            reports: Arc::new(ReportService::new(db, alerts.clone())),
            alerts,
        }
    }
}
