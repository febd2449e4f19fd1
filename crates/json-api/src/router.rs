//! App Router

use std::sync::Arc;

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};

use crate::{
    accounts, auth, healthcheck,
    observability::{metrics_handler, request_logging},
    products,
    rate_limit::RateLimit,
    reports, sales,
    state::State,
};

const OPENAPI_PATH: &str = "/api-doc/openapi.json";

/// Unauthenticated account routes. Each passes an address-keyed limiter.
fn auth_router() -> Router {
    Router::with_path("auth")
        .push(
            Router::with_path("register")
                .hoop(RateLimit::auth())
                .post(auth::register::handler),
        )
        .push(
            Router::with_path("login")
                .hoop(RateLimit::auth())
                .post(auth::login::handler),
        )
        .push(
            Router::with_path("reset")
                .hoop(RateLimit::password_reset())
                .post(auth::reset::handler),
        )
}

/// Routes that need a bearer token. The account budget is charged after authentication.
fn api_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .hoop(RateLimit::api())
        .push(
            Router::with_path("account")
                .get(accounts::get::handler)
                .put(accounts::update::handler)
                .delete(accounts::delete::handler),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(Router::with_path("low-stock").get(products::low_stock::handler))
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(
            Router::with_path("sales")
                .get(sales::index::handler)
                .post(sales::create::handler)
                .push(
                    Router::with_path("{sale}")
                        .get(sales::get::handler)
                        .push(Router::with_path("void").post(sales::void::handler)),
                ),
        )
        .push(
            Router::with_path("reports")
                .push(Router::with_path("summary").get(reports::summary::handler))
                .push(Router::with_path("chart").get(reports::chart::handler))
                .push(Router::with_path("export").get(reports::export::handler))
                .push(Router::with_path("dashboard").get(reports::dashboard::handler)),
        )
}

/// Full application router with OpenAPI docs attached.
pub(crate) fn app_router(state: Arc<State>) -> Router {
    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(request_logging)
        .hoop(inject(state))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(auth_router())
        .push(api_router());

    let doc = OpenApi::new("Tindahan API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    router
        .push(doc.into_router(OPENAPI_PATH))
        .push(SwaggerUi::new(OPENAPI_PATH).into_router("docs"))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use tindahan_app::auth::MockAuthService;

    use crate::test_helpers::Mocks;

    use super::*;

    #[tokio::test]
    async fn healthcheck_is_public() -> TestResult {
        let service = Service::new(app_router(Mocks::default().into_state()));

        let res = TestClient::get("http://example.com/healthcheck")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn api_routes_require_a_token() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let service = Service::new(app_router(Mocks::default().auth(auth).into_state()));

        for path in [
            "account",
            "products",
            "sales",
            "reports/dashboard",
            "products/low-stock",
        ] {
            let res = TestClient::get(format!("http://example.com/{path}"))
                .send(&service)
                .await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::UNAUTHORIZED),
                "{path} should need a token"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() -> TestResult {
        let service = Service::new(app_router(Mocks::default().into_state()));

        let body = TestClient::get(format!("http://example.com{OPENAPI_PATH}"))
            .send(&service)
            .await
            .take_string()
            .await?;

        for path in ["/auth/reset", "/account", "/sales/{sale}/void", "/reports/export"] {
            assert!(body.contains(path), "expected {path} in the OpenAPI document");
        }

        Ok(())
    }
}
