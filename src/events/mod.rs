use async_trait::async_trait;
use metrics::counter;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::entities::{DocumentKind, OrderStatus};
use crate::errors::ServiceError;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), ServiceError> {
        self.sender
            .send(event)
            .await
            .map_err(|e| ServiceError::EventError(format!("Failed to send event: {}", e)))
    }

    /// Sends an event after the owning transaction has committed. The write is
    /// already durable at that point, so a closed channel is only logged.
    pub async fn send_or_log(&self, event: Event) {
        let name = event.name();
        if let Err(e) = self.send(event).await {
            warn!(event = name, error = %e, "Dropping domain event");
            counter!("henhouse_events.dropped", 1);
        }
    }
}

/// Domain events raised by the farm ledger once a change is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    PurchaseRecorded {
        purchase_id: Uuid,
        item_id: Uuid,
        quantity: Decimal,
    },
    UsageRecorded {
        usage_id: Uuid,
        item_id: Uuid,
        quantity: Decimal,
    },
    StockAdjusted {
        item_id: Uuid,
        delta: Decimal,
        reason: String,
    },
    OrderPlaced {
        order_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    },
    OrderStatusChanged {
        order_id: Uuid,
        old_status: OrderStatus,
        new_status: OrderStatus,
    },
    OrderCancelled {
        order_id: Uuid,
        restored_quantity: i32,
    },
    DocumentIssued {
        document_id: Uuid,
        number: String,
        kind: DocumentKind,
    },
    DocumentVoided {
        document_id: Uuid,
        number: String,
    },
    /// Raised once when an item's balance drops below its threshold.
    LowStockWarning {
        item_id: Uuid,
        item_name: String,
        balance: Decimal,
        threshold: Decimal,
    },
    PayrollPaid {
        payment_id: Uuid,
        employee_id: Uuid,
        month: String,
        amount: Decimal,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::PurchaseRecorded { .. } => "purchase_recorded",
            Event::UsageRecorded { .. } => "usage_recorded",
            Event::StockAdjusted { .. } => "stock_adjusted",
            Event::OrderPlaced { .. } => "order_placed",
            Event::OrderStatusChanged { .. } => "order_status_changed",
            Event::OrderCancelled { .. } => "order_cancelled",
            Event::DocumentIssued { .. } => "document_issued",
            Event::DocumentVoided { .. } => "document_voided",
            Event::LowStockWarning { .. } => "low_stock_warning",
            Event::PayrollPaid { .. } => "payroll_paid",
        }
    }
}

/// Downstream consumer of domain events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle_event(&self, event: &Event) -> Result<(), String>;
}

/// Logs every event. Low-stock warnings are surfaced at `warn` so they reach
/// whoever watches the farm's logs.
pub struct LoggingEventHandler;

#[async_trait]
impl EventHandler for LoggingEventHandler {
    async fn handle_event(&self, event: &Event) -> Result<(), String> {
        match event {
            Event::LowStockWarning {
                item_id,
                item_name,
                balance,
                threshold,
            } => {
                warn!(%item_id, item_name, %balance, %threshold, "Stock is running low");
            }
            other => info!(event = other.name(), payload = ?other, "Domain event"),
        }
        Ok(())
    }
}

/// Drains the event channel and fans each event out to the handlers.
pub async fn process_events(mut rx: mpsc::Receiver<Event>, handlers: Vec<Arc<dyn EventHandler>>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        counter!("henhouse_events.processed", 1, "event" => event.name());
        for handler in &handlers {
            if let Err(e) = handler.handle_event(&event).await {
                error!(event = event.name(), error = %e, "Event handler failed");
            }
        }
    }

    info!("Event channel closed; event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<&'static str>>);

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle_event(&self, event: &Event) -> Result<(), String> {
            self.0.lock().unwrap().push(event.name());
            Ok(())
        }
    }

    #[tokio::test]
    async fn processor_fans_out_until_channel_closes() {
        let (tx, rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));

        let task = tokio::spawn(process_events(
            rx,
            vec![recorder.clone(), Arc::new(LoggingEventHandler)],
        ));

        sender
            .send(Event::OrderCancelled {
                order_id: Uuid::new_v4(),
                restored_quantity: 3,
            })
            .await
            .unwrap();
        drop(sender);
        task.await.unwrap();

        assert_eq!(*recorder.0.lock().unwrap(), vec!["order_cancelled"]);
    }

    #[tokio::test]
    async fn send_or_log_survives_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        sender
            .send_or_log(Event::DocumentVoided {
                document_id: Uuid::nil(),
                number: "INV-20261018-00000000".into(),
            })
            .await;
        assert!(sender
            .send(Event::DocumentVoided {
                document_id: Uuid::nil(),
                number: "x".into(),
            })
            .await
            .is_err());
    }
}
