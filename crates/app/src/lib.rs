//! Tindahan point-of-sale domain, persistence, and rate limiting.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod rate_limit;

#[cfg(test)]
mod test;

mod uuids;
