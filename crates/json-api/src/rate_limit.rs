//! Rate limit middleware.

use std::sync::Arc;

use salvo::{
    http::{
        HeaderName, StatusCode,
        header::{HeaderValue, RETRY_AFTER},
    },
    oapi::ToSchema,
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tindahan_app::rate_limit::{RateLimitDecision, RateLimiter, RateLimiters, keys};

use crate::{extensions::*, observability::record_rate_limit_rejection, state::State};

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Body of a 429 response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RateLimitedResponse {
    pub error: String,

    /// Seconds until the window resets.
    pub retry_after: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Limiter {
    /// Keyed by the authenticated account.
    Api,

    /// Keyed by client address.
    Auth,

    /// Keyed by client address.
    PasswordReset,
}

impl Limiter {
    fn pick(self, limiters: &RateLimiters) -> &RateLimiter {
        match self {
            Self::Api => &limiters.api,
            Self::Auth => &limiters.auth,
            Self::PasswordReset => &limiters.password_reset,
        }
    }
}

/// Middleware that counts each request against one named limiter.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RateLimit {
    limiter: Limiter,
}

impl RateLimit {
    /// Per-account budget. Must run after the auth middleware.
    pub(crate) const fn api() -> Self {
        Self {
            limiter: Limiter::Api,
        }
    }

    pub(crate) const fn auth() -> Self {
        Self {
            limiter: Limiter::Auth,
        }
    }

    pub(crate) const fn password_reset() -> Self {
        Self {
            limiter: Limiter::PasswordReset,
        }
    }

    fn identifier(
        self,
        req: &Request,
        depot: &Depot,
        trust_proxy_headers: bool,
    ) -> Result<String, StatusError> {
        match self.limiter {
            Limiter::Api => depot.account_uuid_or_401().map(keys::account),
            Limiter::Auth | Limiter::PasswordReset => {
                Ok(keys::ip(&client_ip(req, trust_proxy_headers)))
            }
        }
    }
}

#[handler]
impl RateLimit {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        let state = match depot.obtain_or_500::<Arc<State>>() {
            Ok(state) => Arc::clone(state),
            Err(error) => {
                res.render(error);
                ctrl.skip_rest();

                return;
            }
        };

        let identifier = match self.identifier(req, depot, state.trust_proxy_headers) {
            Ok(identifier) => identifier,
            Err(error) => {
                res.render(error);
                ctrl.skip_rest();

                return;
            }
        };

        let limiter = self.limiter.pick(&state.limiters);
        let decision = limiter.check(&identifier);

        set_limit_headers(res, &decision);

        if decision.limited {
            record_rate_limit_rejection(limiter.name());
            reject(res, &decision);
            ctrl.skip_rest();

            return;
        }

        ctrl.call_next(req, depot, res).await;
    }
}

/// Caller address. With `trust_proxy_headers`: first `x-forwarded-for` entry, then
/// `x-real-ip`. Otherwise, or when neither is present, the socket peer.
pub(crate) fn client_ip(req: &Request, trust_proxy_headers: bool) -> String {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned)
    };

    let peer = || {
        let remote = req.remote_addr();

        remote
            .as_ipv4()
            .map(|addr| addr.ip().to_string())
            .or_else(|| remote.as_ipv6().map(|addr| addr.ip().to_string()))
    };

    let forwarded = || {
        trust_proxy_headers
            .then(|| header(FORWARDED_FOR).or_else(|| header(REAL_IP)))
            .flatten()
    };

    forwarded()
        .or_else(peer)
        .unwrap_or_else(|| "unknown".to_string())
}

fn set_limit_headers(res: &mut Response, decision: &RateLimitDecision) {
    let headers = res.headers_mut();

    headers.insert(
        HeaderName::from_static(LIMIT_HEADER),
        HeaderValue::from(decision.limit),
    );
    headers.insert(
        HeaderName::from_static(REMAINING_HEADER),
        HeaderValue::from(decision.remaining),
    );
    headers.insert(
        HeaderName::from_static(RESET_HEADER),
        HeaderValue::from(decision.reset_at.as_millisecond()),
    );
}

fn reject(res: &mut Response, decision: &RateLimitDecision) {
    let retry_after = decision.retry_after_secs();

    res.headers_mut()
        .insert(RETRY_AFTER, HeaderValue::from(retry_after));

    res.status_code(StatusCode::TOO_MANY_REQUESTS);
    res.render(Json(RateLimitedResponse {
        error: "Too many requests, please try again later.".to_string(),
        retry_after,
    }));
}

#[cfg(test)]
mod tests {
    use std::{num::NonZeroU32, time::Duration};

    use jiff::Timestamp;
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;
    use tindahan_app::rate_limit::{ManualClock, RateLimitPolicy, RateLimitSettings};

    use crate::test_helpers::{Mocks, TEST_ACCOUNT_UUID, inject_account};

    use super::*;

    #[handler]
    async fn ok() -> &'static str {
        "ok"
    }

    fn limiters(max: u32) -> Result<(Arc<RateLimiters>, Arc<ManualClock>), String> {
        let max = NonZeroU32::new(max).ok_or("zero budget")?;
        let policy = RateLimitPolicy::new(max, Duration::from_secs(60));
        let clock = Arc::new(ManualClock::new(Timestamp::UNIX_EPOCH));

        let limiters = RateLimiters::with_clock(
            RateLimitSettings {
                api: policy,
                auth: policy,
                password_reset: policy,
                email: policy,
            },
            clock.clone(),
        );

        Ok((Arc::new(limiters), clock))
    }

    fn service_with(mocks: Mocks, limit: RateLimit) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(mocks.into_state()))
                .hoop(inject_account)
                .push(Router::with_path("limited").hoop(limit).get(ok)),
        )
    }

    fn service(limiters: Arc<RateLimiters>, limit: RateLimit) -> Service {
        service_with(Mocks::default().limiters(limiters), limit)
    }

    fn proxied_service(limiters: Arc<RateLimiters>, limit: RateLimit) -> Service {
        service_with(
            Mocks::default().limiters(limiters).trust_proxy_headers(),
            limit,
        )
    }

    fn header<'a>(res: &'a Response, name: &str) -> Option<&'a str> {
        res.headers().get(name).and_then(|value| value.to_str().ok())
    }

    #[tokio::test]
    async fn admitted_requests_count_down_remaining() -> TestResult {
        let (limiters, _clock) = limiters(2)?;
        let service = service(limiters, RateLimit::auth());

        let first = TestClient::get("http://example.com/limited")
            .send(&service)
            .await;
        let second = TestClient::get("http://example.com/limited")
            .send(&service)
            .await;

        assert_eq!(first.status_code, Some(StatusCode::OK));
        assert_eq!(header(&first, LIMIT_HEADER), Some("2"));
        assert_eq!(header(&first, REMAINING_HEADER), Some("1"));
        assert_eq!(header(&second, REMAINING_HEADER), Some("0"));
        assert_eq!(header(&first, RESET_HEADER), Some("60000"));

        Ok(())
    }

    #[tokio::test]
    async fn over_budget_returns_429_with_retry_after() -> TestResult {
        let (limiters, clock) = limiters(1)?;
        let service = service(limiters, RateLimit::password_reset());

        TestClient::get("http://example.com/limited")
            .send(&service)
            .await;

        clock.advance(Duration::from_millis(15_500));

        let mut res = TestClient::get("http://example.com/limited")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::TOO_MANY_REQUESTS));
        assert_eq!(header(&res, "retry-after"), Some("45"));
        assert_eq!(header(&res, REMAINING_HEADER), Some("0"));

        let body: RateLimitedResponse = res.take_json().await?;

        assert_eq!(body.retry_after, 45);

        Ok(())
    }

    #[tokio::test]
    async fn window_reset_admits_again() -> TestResult {
        let (limiters, clock) = limiters(1)?;
        let service = service(limiters, RateLimit::auth());

        TestClient::get("http://example.com/limited")
            .send(&service)
            .await;

        clock.advance(Duration::from_secs(60));

        let res = TestClient::get("http://example.com/limited")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn forwarded_addresses_get_separate_budgets_behind_a_proxy() -> TestResult {
        let (limiters, _clock) = limiters(1)?;
        let service = proxied_service(limiters.clone(), RateLimit::auth());

        let first = TestClient::get("http://example.com/limited")
            .add_header(FORWARDED_FOR, "203.0.113.7, 10.0.0.1", true)
            .send(&service)
            .await;
        let other = TestClient::get("http://example.com/limited")
            .add_header(REAL_IP, "198.51.100.2", true)
            .send(&service)
            .await;

        assert_eq!(first.status_code, Some(StatusCode::OK));
        assert_eq!(other.status_code, Some(StatusCode::OK));
        assert!(limiters.auth.status("ip:203.0.113.7").is_some());
        assert!(limiters.auth.status("ip:198.51.100.2").is_some());

        Ok(())
    }

    #[tokio::test]
    async fn rotating_forwarded_header_does_not_reset_budget() -> TestResult {
        let (limiters, _clock) = limiters(1)?;
        let service = service(limiters.clone(), RateLimit::auth());

        let first = TestClient::get("http://example.com/limited")
            .add_header(FORWARDED_FOR, "203.0.113.7", true)
            .send(&service)
            .await;
        let second = TestClient::get("http://example.com/limited")
            .add_header(FORWARDED_FOR, "203.0.113.8", true)
            .send(&service)
            .await;

        assert_eq!(first.status_code, Some(StatusCode::OK));
        assert_eq!(second.status_code, Some(StatusCode::TOO_MANY_REQUESTS));
        assert!(limiters.auth.status("ip:203.0.113.7").is_none());

        Ok(())
    }

    #[tokio::test]
    async fn api_limiter_is_keyed_by_account() -> TestResult {
        let (limiters, _clock) = limiters(5)?;
        let service = service(limiters.clone(), RateLimit::api());

        TestClient::get("http://example.com/limited")
            .send(&service)
            .await;

        let status = limiters
            .api
            .status(&keys::account(TEST_ACCOUNT_UUID))
            .ok_or("no api entry")?;

        assert_eq!(status.count, 1);
        assert!(limiters.auth.status("ip:unknown").is_none());

        Ok(())
    }
}
