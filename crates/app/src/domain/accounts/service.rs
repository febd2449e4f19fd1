//! Accounts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;

use crate::domain::accounts::{
    data::{AccountUpdate, NewAccount},
    email::EmailAddress,
    errors::AccountsServiceError,
    records::{AccountRecord, AccountUuid},
    repository::PgAccountsRepository,
};

#[derive(Debug, Clone)]
pub struct PgAccountsService {
    repository: PgAccountsRepository,
}

impl PgAccountsService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAccountsRepository::new(pool),
        }
    }
}

#[async_trait]
impl AccountsService for PgAccountsService {
    async fn create_account(
        &self,
        account: NewAccount,
    ) -> Result<AccountRecord, AccountsServiceError> {
        if account.name.trim().is_empty() {
            return Err(AccountsServiceError::EmptyName);
        }

        self.repository
            .create_account(account)
            .await
            .map_err(Into::into)
    }

    async fn get_account(&self, account: AccountUuid) -> Result<AccountRecord, AccountsServiceError> {
        self.repository
            .get_account(account)
            .await
            .map_err(Into::into)
    }

    async fn find_account_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<AccountRecord, AccountsServiceError> {
        self.repository
            .find_account_by_email(email)
            .await
            .map_err(Into::into)
    }

    async fn update_account(
        &self,
        account: AccountUuid,
        update: AccountUpdate,
    ) -> Result<AccountRecord, AccountsServiceError> {
        if update.name.trim().is_empty() {
            return Err(AccountsServiceError::EmptyName);
        }

        self.repository
            .update_account(account, &update)
            .await
            .map_err(Into::into)
    }

    #[tracing::instrument(
        name = "accounts.service.delete_account",
        skip(self),
        fields(account_uuid = %account),
        err
    )]
    async fn delete_account(&self, account: AccountUuid) -> Result<(), AccountsServiceError> {
        let mut tx = self.repository.begin().await?;

        if self.repository.delete_account(&mut tx, account).await? == 0 {
            return Err(AccountsServiceError::NotFound);
        }

        let revoked = self
            .repository
            .revoke_account_tokens(&mut tx, account)
            .await?;

        tx.commit().await?;

        info!(revoked, "deleted account");

        Ok(())
    }
}

#[automock]
#[async_trait]
/// Shop owner accounts.
pub trait AccountsService: Send + Sync {
    /// Creates a new account. E-mail addresses are unique among live accounts.
    async fn create_account(&self, account: NewAccount)
    -> Result<AccountRecord, AccountsServiceError>;

    /// Retrieve a live account.
    async fn get_account(&self, account: AccountUuid) -> Result<AccountRecord, AccountsServiceError>;

    /// Look up a live account by its e-mail address.
    async fn find_account_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<AccountRecord, AccountsServiceError>;

    /// Replace the profile of a live account.
    async fn update_account(
        &self,
        account: AccountUuid,
        update: AccountUpdate,
    ) -> Result<AccountRecord, AccountsServiceError>;

    /// Soft-delete an account and revoke all of its tokens. The e-mail address becomes free
    /// for a new registration.
    async fn delete_account(&self, account: AccountUuid) -> Result<(), AccountsServiceError>;
}
