//! Update Account Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use tindahan_app::domain::accounts::data::AccountUpdate;

use crate::{
    auth::{AccountResponse, errors::account_status_error},
    extensions::*,
    state::State,
};

/// Account profile fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AccountUpdateRequest {
    /// Shop or owner name
    pub name: String,
}

/// Update Account Handler
#[endpoint(
    tags("account"),
    summary = "Update Account",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Account updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Account not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AccountUpdateRequest>,
    depot: &mut Depot,
) -> Result<Json<AccountResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;

    let updated = state
        .app
        .accounts
        .update_account(
            account,
            AccountUpdate {
                name: json.into_inner().name,
            },
        )
        .await
        .map_err(account_status_error)?;

    info!(account_uuid = %account, "account updated");

    Ok(Json(updated.into()))
}
