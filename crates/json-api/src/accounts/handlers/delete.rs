//! Delete Account Handler

use std::sync::Arc;

use salvo::prelude::*;
use tracing::info;

use crate::{auth::errors::account_status_error, extensions::*, state::State};

/// Delete Account Handler
///
/// Soft-deletes the account and revokes every token it holds, including the one used for
/// this request.
#[endpoint(
    tags("account"),
    summary = "Delete Account",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Account deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Account not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;

    state
        .app
        .accounts
        .delete_account(account)
        .await
        .map_err(account_status_error)?;

    info!(account_uuid = %account, "account deleted");

    Ok(StatusCode::NO_CONTENT)
}
