//! Auth Handlers

pub(crate) mod login;
pub(crate) mod register;
pub(crate) mod reset;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tindahan_app::domain::accounts::records::AccountRecord;

/// Public view of an account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AccountResponse {
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<AccountRecord> for AccountResponse {
    fn from(account: AccountRecord) -> Self {
        Self {
            uuid: account.uuid.into_uuid(),
            name: account.name,
            email: account.email.into(),
            created_at: account.created_at.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use tindahan_app::domain::accounts::{
        email::{EmailAddress, InvalidEmailAddress},
        records::{AccountRecord, AccountUuid},
    };

    pub(super) fn make_account(
        uuid: AccountUuid,
        email: &str,
    ) -> Result<AccountRecord, InvalidEmailAddress> {
        Ok(AccountRecord {
            uuid,
            name: "Aling Nena's Store".to_string(),
            email: EmailAddress::parse(email)?,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        })
    }
}
