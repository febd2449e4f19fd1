//! Auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use tindahan_app::auth::AuthServiceError;

use crate::{extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(error) => {
            res.render(error);
            ctrl.skip_rest();

            return;
        }
    };

    let account_uuid = match state.app.auth.authenticate_bearer(&token).await {
        Ok(account_uuid) => account_uuid,
        Err(error) => {
            res.render(bearer_status_error(error));
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_account_uuid(account_uuid);

    ctrl.call_next(req, depot, res).await;
}

fn bearer_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::NotFound | AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid API token")
        }
        AuthServiceError::Sql(source) => {
            error!("failed to validate api token: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Token(source) => {
            error!("failed to process api token: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Account(source) => {
            error!("failed to load token account: {source}");

            StatusError::internal_server_error()
        }
    }
}

fn extract_bearer_token(req: &Request) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token.to_string())
}
