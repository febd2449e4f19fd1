//! Outbox Data

use crate::domain::{
    accounts::{email::EmailAddress, records::AccountUuid},
    outbox::records::OutboxMessageUuid,
};

/// New Outbox Message Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOutboxMessage {
    pub uuid: OutboxMessageUuid,

    /// Account the message concerns, if any.
    pub account_uuid: Option<AccountUuid>,

    pub recipient: EmailAddress,
    pub subject: String,

    /// Plain-text body.
    pub body: String,
}
