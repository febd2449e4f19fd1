//! Identifier namespaces for limiter keys.

use std::fmt::Display;

/// Key for a caller identified by network address.
pub fn ip(address: &str) -> String {
    format!("ip:{address}")
}

/// Key for an authenticated account.
pub fn account(uuid: impl Display) -> String {
    format!("account:{uuid}")
}

/// Key for an e-mail recipient. Addresses compare case-insensitively.
pub fn email(address: &str) -> String {
    format!("email:{}", address.trim().to_lowercase())
}
