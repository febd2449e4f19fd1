//! Tindahan Domain Concerns

pub mod accounts;
pub mod outbox;
pub mod products;
pub mod reports;
pub mod sales;
