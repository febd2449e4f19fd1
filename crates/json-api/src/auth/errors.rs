//! Auth Errors

use salvo::http::StatusError;
use tracing::error;

use tindahan_app::{auth::AuthServiceError, domain::accounts::AccountsServiceError};

pub(crate) fn auth_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::NotFound | AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid e-mail or token")
        }
        AuthServiceError::Sql(source) => {
            error!("failed to access api tokens: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Token(source) => {
            error!("failed to process api token: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Account(source) => {
            error!("failed to load account: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn account_status_error(error: AccountsServiceError) -> StatusError {
    match error {
        AccountsServiceError::AlreadyExists => {
            StatusError::conflict().brief("An account with this e-mail already exists")
        }
        AccountsServiceError::EmptyName => StatusError::bad_request().brief("Name is required"),
        AccountsServiceError::NotFound => StatusError::not_found().brief("Account not found"),
        AccountsServiceError::InvalidReference
        | AccountsServiceError::MissingRequiredData
        | AccountsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid account payload")
        }
        AccountsServiceError::Sql(source) => {
            error!("failed to access accounts: {source}");

            StatusError::internal_server_error()
        }
    }
}
