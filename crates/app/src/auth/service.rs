//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, ApiTokenVersion, AuthServiceError, IssuedApiToken,
        build_verifier_input, format_api_token, generate_api_token_secret, hash_verifier_input,
        models::NewApiToken, parse_api_token, repository::PgAuthRepository, verifiers_match,
    },
    domain::accounts::{
        AccountsService, PgAccountsService,
        email::EmailAddress,
        records::{AccountRecord, AccountUuid},
    },
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
    accounts: PgAccountsService,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool.clone()),
            accounts: PgAccountsService::new(pool),
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AccountUuid, AuthServiceError> {
        let parsed_token = parse_api_token(bearer_token).map_err(|_| AuthServiceError::NotFound)?;

        let token = self
            .repository
            .find_active_api_token_by_uuid(parsed_token.token_uuid, parsed_token.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if token.version != parsed_token.version {
            return Err(AuthServiceError::NotFound);
        }

        let verifier = hash_verifier_input(&build_verifier_input(
            &parsed_token.token_uuid,
            parsed_token.version,
            &token.account_uuid,
            &parsed_token.secret,
        ));

        if !verifiers_match(&verifier, &token.token_hash) {
            return Err(AuthServiceError::NotFound);
        }

        // Best-effort metadata update; auth success should not depend on this write.
        if let Err(error) = self
            .repository
            .touch_api_token_last_used(parsed_token.token_uuid)
            .await
        {
            debug!(%error, "failed to record token use");
        }

        Ok(token.account_uuid)
    }

    async fn login(
        &self,
        email: &EmailAddress,
        token: &str,
    ) -> Result<AccountRecord, AuthServiceError> {
        let account_uuid = match self.authenticate_bearer(token).await {
            Ok(account_uuid) => account_uuid,
            Err(AuthServiceError::NotFound) => return Err(AuthServiceError::InvalidCredentials),
            Err(error) => return Err(error),
        };

        let account = self.accounts.get_account(account_uuid).await?;

        if &account.email != email {
            return Err(AuthServiceError::InvalidCredentials);
        }

        Ok(account)
    }

    async fn issue_api_token(
        &self,
        account: AccountUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, version, &secret);

        let token_hash =
            hash_verifier_input(&build_verifier_input(&token_uuid, version, &account, &secret));

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token_uuid,
                account_uuid: account,
                version,
                token_hash,
                expires_at,
            })
            .await?;

        Ok(IssuedApiToken { token, metadata })
    }

    async fn list_api_tokens(
        &self,
        account: AccountUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        self.repository
            .list_api_tokens_by_account(account)
            .await
            .map_err(AuthServiceError::from)
    }

    async fn revoke_api_token(
        &self,
        account: AccountUuid,
        token_uuid: Uuid,
    ) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_api_token(account, token_uuid)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the account that owns it.
    async fn authenticate_bearer(&self, bearer_token: &str)
    -> Result<AccountUuid, AuthServiceError>;

    /// Check that `token` is a live token of the account registered with `email`.
    async fn login(
        &self,
        email: &EmailAddress,
        token: &str,
    ) -> Result<AccountRecord, AuthServiceError>;

    /// Issue a new API token. The raw token is only ever returned here.
    async fn issue_api_token(
        &self,
        account: AccountUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError>;

    /// All tokens of an account, newest first.
    async fn list_api_tokens(
        &self,
        account: AccountUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError>;

    /// Revoke a token. Returns `true` if the token was active.
    async fn revoke_api_token(
        &self,
        account: AccountUuid,
        token_uuid: Uuid,
    ) -> Result<bool, AuthServiceError>;
}
