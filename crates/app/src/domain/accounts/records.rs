//! Account Records

use jiff::Timestamp;

use crate::{domain::accounts::email::EmailAddress, uuids::TypedUuid};

/// Account UUID
pub type AccountUuid = TypedUuid<AccountRecord>;

/// Account Record
#[derive(Debug, Clone)]
pub struct AccountRecord {
    /// Unique account identifier.
    pub uuid: AccountUuid,

    /// Shop or owner name.
    pub name: String,

    /// Normalised e-mail address.
    pub email: EmailAddress,

    /// Account creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,

    /// Soft-delete timestamp when deleted.
    pub deleted_at: Option<Timestamp>,
}
