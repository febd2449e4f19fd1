//! Get Account Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    auth::{AccountResponse, errors::account_status_error},
    extensions::*,
    state::State,
};

/// Get Account Handler
///
/// The account the bearer token belongs to.
#[endpoint(
    tags("account"),
    summary = "Get Account",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<AccountResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;

    let account = state
        .app
        .accounts
        .get_account(account)
        .await
        .map_err(account_status_error)?;

    Ok(Json(account.into()))
}
