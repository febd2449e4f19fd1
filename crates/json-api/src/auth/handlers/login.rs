//! Login Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use tindahan_app::domain::accounts::email::EmailAddress;

use crate::{
    auth::{errors::auth_status_error, handlers::AccountResponse},
    extensions::*,
    state::State,
};

/// Login Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub email: String,

    /// API token issued at registration or recovery
    pub token: String,
}

/// Login Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginResponse {
    pub account: AccountResponse,
}

/// Login Handler
///
/// Checks that a token belongs to the account registered with the e-mail address.
#[endpoint(
    tags("auth"),
    summary = "Login",
    responses(
        (status_code = StatusCode::OK, description = "Credentials accepted"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid e-mail or token"),
        (status_code = StatusCode::TOO_MANY_REQUESTS, description = "Too Many Requests"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<LoginResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    // A malformed address can't match any account; answer like any other mismatch.
    let email = EmailAddress::parse(&request.email)
        .map_err(|_ignored| StatusError::unauthorized().brief("Invalid e-mail or token"))?;

    let account = state
        .app
        .auth
        .login(&email, request.token.trim())
        .await
        .map_err(auth_status_error)?;

    Ok(Json(LoginResponse {
        account: account.into(),
    }))
}
