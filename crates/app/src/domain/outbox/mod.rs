//! E-mail Outbox
//!
//! Messages are only queued here. Delivery belongs to a separate worker that reads unsent
//! messages and marks them sent.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::OutboxServiceError;
pub use service::*;
