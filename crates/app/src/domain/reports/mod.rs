//! Reports

pub mod chart;
pub mod errors;
pub mod export;
pub mod period;
mod repository;
pub mod service;
pub mod summary;

pub use errors::ReportsServiceError;
pub use service::*;
