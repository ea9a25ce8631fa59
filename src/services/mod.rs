// Stock ledger
pub mod alerts;
pub mod inventory;

// Stock in and out
pub mod orders;
pub mod purchases;
pub mod usage;

// Money
pub mod amounts;
pub mod invoicing;
pub mod payroll;
pub mod pricing;

pub mod reports;
