//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{auth::ApiTokenError, domain::accounts::AccountsServiceError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("token not found")]
    NotFound,

    #[error("e-mail and token do not match")]
    InvalidCredentials,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("token processing error")]
    Token(#[source] ApiTokenError),

    #[error("account lookup failed")]
    Account(#[source] AccountsServiceError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

impl From<ApiTokenError> for AuthServiceError {
    fn from(error: ApiTokenError) -> Self {
        Self::Token(error)
    }
}

impl From<AccountsServiceError> for AuthServiceError {
    fn from(error: AccountsServiceError) -> Self {
        match error {
            AccountsServiceError::NotFound => Self::InvalidCredentials,
            other => Self::Account(other),
        }
    }
}
