//! Register Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use tindahan_app::domain::accounts::{
    data::NewAccount,
    email::EmailAddress,
    records::AccountUuid,
};

use crate::{
    auth::{
        errors::{account_status_error, auth_status_error},
        handlers::AccountResponse,
    },
    extensions::*,
    state::State,
};

/// Register Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    /// Shop or owner name
    pub name: String,

    /// Sign-in and recovery address
    pub email: String,
}

/// Registered Account Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisteredResponse {
    pub account: AccountResponse,

    /// API token. Only ever shown here.
    pub token: String,
}

/// Register Handler
///
/// Creates an account and its first API token.
#[endpoint(
    tags("auth"),
    summary = "Register",
    responses(
        (status_code = StatusCode::CREATED, description = "Account created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::CONFLICT, description = "E-mail already registered"),
        (status_code = StatusCode::TOO_MANY_REQUESTS, description = "Too Many Requests"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<RegisteredResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let email = EmailAddress::parse(&request.email).or_400("A valid e-mail address is required")?;

    let account = state
        .app
        .accounts
        .create_account(NewAccount {
            uuid: AccountUuid::new(),
            name: request.name.trim().to_string(),
            email,
        })
        .await
        .map_err(account_status_error)?;

    let issued = state
        .app
        .auth
        .issue_api_token(account.uuid, None)
        .await
        .map_err(auth_status_error)?;

    info!(account_uuid = %account.uuid, "account registered");

    res.status_code(StatusCode::CREATED);

    Ok(Json(RegisteredResponse {
        account: account.into(),
        token: issued.token,
    }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;
    use uuid::Uuid;

    use tindahan_app::{
        auth::{ApiTokenMetadata, ApiTokenVersion, IssuedApiToken, MockAuthService},
        domain::accounts::{AccountsServiceError, MockAccountsService},
    };

    use crate::{
        auth::handlers::tests::make_account,
        test_helpers::{Mocks, public_service},
    };

    use super::*;

    fn make_service(accounts: MockAccountsService, auth: MockAuthService) -> Service {
        public_service(
            Mocks::default().accounts(accounts).auth(auth),
            Router::with_path("auth/register").post(handler),
        )
    }

    #[tokio::test]
    async fn register_returns_account_and_token() -> TestResult {
        let mut accounts = MockAccountsService::new();
        let mut auth = MockAuthService::new();

        accounts
            .expect_create_account()
            .once()
            .withf(|new| new.name == "Aling Nena's Store" && new.email.as_str() == "nena@store.ph")
            .returning(|new| {
                make_account(new.uuid, new.email.as_str())
                    .map_err(|_ignored| AccountsServiceError::InvalidData)
            });

        auth.expect_issue_api_token()
            .once()
            .withf(|_, expires_at| expires_at.is_none())
            .returning(|account, _| {
                Ok(IssuedApiToken {
                    token: "tdn_v1_token".to_string(),
                    metadata: ApiTokenMetadata {
                        uuid: Uuid::now_v7(),
                        account_uuid: account,
                        version: ApiTokenVersion::V1,
                        created_at: Timestamp::UNIX_EPOCH,
                        last_used_at: None,
                        expires_at: None,
                        revoked_at: None,
                    },
                })
            });

        let mut res = TestClient::post("http://example.com/auth/register")
            .json(&json!({ "name": "  Aling Nena's Store ", "email": "Nena@Store.PH" }))
            .send(&make_service(accounts, auth))
            .await;

        let body: RegisteredResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.token, "tdn_v1_token");
        assert_eq!(body.account.email, "nena@store.ph");

        Ok(())
    }

    #[tokio::test]
    async fn register_with_invalid_email_returns_400() -> TestResult {
        let res = TestClient::post("http://example.com/auth/register")
            .json(&json!({ "name": "Store", "email": "not-an-email" }))
            .send(&make_service(MockAccountsService::new(), MockAuthService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn register_existing_email_returns_409() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_create_account()
            .once()
            .returning(|_| Err(AccountsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/auth/register")
            .json(&json!({ "name": "Store", "email": "taken@store.ph" }))
            .send(&make_service(accounts, MockAuthService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn register_blank_name_returns_400() -> TestResult {
        let mut accounts = MockAccountsService::new();

        accounts
            .expect_create_account()
            .once()
            .returning(|_| Err(AccountsServiceError::EmptyName));

        let res = TestClient::post("http://example.com/auth/register")
            .json(&json!({ "name": "   ", "email": "blank@store.ph" }))
            .send(&make_service(accounts, MockAuthService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
