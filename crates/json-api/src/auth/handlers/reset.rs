//! Token Recovery Handler

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use tindahan_app::{
    auth::IssuedApiToken,
    domain::{
        accounts::{AccountsServiceError, email::EmailAddress, records::AccountRecord},
        outbox::{data::NewOutboxMessage, records::OutboxMessageUuid},
    },
    rate_limit::keys,
};

use crate::{
    auth::errors::{account_status_error, auth_status_error},
    extensions::*,
    observability::record_rate_limit_rejection,
    state::State,
};

const GENERIC_MESSAGE: &str =
    "If an account exists with this e-mail, a new API token is on its way.";

const RECOVERY_SUBJECT: &str = "Your new Tindahan API token";

const RECOVERY_TOKEN_LIFETIME: SignedDuration = SignedDuration::from_hours(24);

/// Reset Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ResetRequest {
    pub email: String,
}

/// Reset Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ResetResponse {
    pub message: String,
}

/// Token Recovery Handler
///
/// Issues a short-lived token and queues it for e-mail delivery. The response never
/// reveals whether the address is registered.
#[endpoint(
    tags("auth"),
    summary = "Recover API token",
    responses(
        (status_code = StatusCode::OK, description = "Request accepted"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::TOO_MANY_REQUESTS, description = "Too Many Requests"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ResetRequest>,
    depot: &mut Depot,
) -> Result<Json<ResetResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let email =
        EmailAddress::parse(&json.into_inner().email).or_400("A valid e-mail address is required")?;

    let account = match state.app.accounts.find_account_by_email(&email).await {
        Ok(account) => account,
        Err(AccountsServiceError::NotFound) => {
            info!(email = %mask_email(email.as_str()), "token recovery for unknown address");

            return Ok(generic_response());
        }
        Err(error) => return Err(account_status_error(error)),
    };

    let limiter = &state.limiters.email;

    if limiter.check(&keys::email(email.as_str())).limited {
        record_rate_limit_rejection(limiter.name());
        warn!(email = %mask_email(email.as_str()), "token recovery e-mail budget exhausted");

        return Ok(generic_response());
    }

    send_recovery_token(state, &account).await?;

    Ok(generic_response())
}

async fn send_recovery_token(state: &State, account: &AccountRecord) -> Result<(), StatusError> {
    let expires_at = Timestamp::now()
        .checked_add(RECOVERY_TOKEN_LIFETIME)
        .or_500("failed to compute token expiry")?;

    let issued = state
        .app
        .auth
        .issue_api_token(account.uuid, Some(expires_at))
        .await
        .map_err(auth_status_error)?;

    let message = NewOutboxMessage {
        uuid: OutboxMessageUuid::new(),
        account_uuid: Some(account.uuid),
        recipient: account.email.clone(),
        subject: RECOVERY_SUBJECT.to_string(),
        body: recovery_body(&account.name, &issued.token, expires_at),
    };

    // Delivery problems stay invisible to the caller.
    match state.app.outbox.enqueue(message).await {
        Ok(queued) => {
            info!(account_uuid = %account.uuid, message_uuid = %queued.uuid, "recovery token queued");
        }
        Err(error) => {
            warn!(account_uuid = %account.uuid, "failed to queue recovery e-mail: {error}");

            revoke_undelivered(state, account, &issued).await;
        }
    }

    Ok(())
}

/// A token that will never reach its owner must not stay valid.
async fn revoke_undelivered(state: &State, account: &AccountRecord, issued: &IssuedApiToken) {
    let token_uuid = issued.metadata.uuid;

    match state.app.auth.revoke_api_token(account.uuid, token_uuid).await {
        Ok(_) => info!(account_uuid = %account.uuid, %token_uuid, "revoked undelivered recovery token"),
        Err(error) => error!(
            account_uuid = %account.uuid,
            %token_uuid,
            "failed to revoke undelivered recovery token: {error}"
        ),
    }
}

fn recovery_body(name: &str, token: &str, expires_at: Timestamp) -> String {
    format!(
        "Hi {name},\n\n\
         We received a request to recover access to your Tindahan account.\n\n\
         Your new API token is:\n\n    {token}\n\n\
         It expires at {expires_at}. If you didn't ask for this, you can ignore this e-mail.\n"
    )
}

fn generic_response() -> Json<ResetResponse> {
    Json(ResetResponse {
        message: GENERIC_MESSAGE.to_string(),
    })
}

/// Keep the first two characters of the local part.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.chars().count() > 2 => {
            let prefix: String = local.chars().take(2).collect();

            format!("{prefix}***@{domain}")
        }
        Some((_, domain)) => format!("***@{domain}"),
        None => "***".to_string(),
    }
}
