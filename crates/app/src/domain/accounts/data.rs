//! Account Data

use crate::domain::accounts::{email::EmailAddress, records::AccountUuid};

/// New Account Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// UUID to assign to the account row.
    pub uuid: AccountUuid,

    /// Shop or owner name.
    pub name: String,

    /// Sign-in and recovery address.
    pub email: EmailAddress,
}

/// Editable account profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountUpdate {
    /// Shop or owner name.
    pub name: String,
}
