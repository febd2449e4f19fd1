//! Outbox Records

use jiff::Timestamp;

use crate::{
    domain::accounts::{email::EmailAddress, records::AccountUuid},
    uuids::TypedUuid,
};

/// Outbox Message UUID
pub type OutboxMessageUuid = TypedUuid<OutboxMessageRecord>;

/// Outbox Message Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxMessageRecord {
    pub uuid: OutboxMessageUuid,
    pub account_uuid: Option<AccountUuid>,
    pub recipient: EmailAddress,
    pub subject: String,
    pub body: String,
    pub created_at: Timestamp,
    pub sent_at: Option<Timestamp>,
}
