pub mod attendance;
pub mod chicken_price;
pub mod employee;
pub mod inventory_item;
pub mod ledger_document;
pub mod order;
pub mod order_status_change;
pub mod payroll_payment;
pub mod purchase_record;
pub mod stock_movement;
pub mod usage_record;
pub mod user;

pub use attendance::AttendanceStatus;
pub use inventory_item::ItemCategory;
pub use ledger_document::{DocumentKind, DocumentStatus, SourceType};
pub use order::OrderStatus;
pub use stock_movement::MovementKind;
