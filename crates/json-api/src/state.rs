//! State

use std::sync::Arc;

use jiff::{Timestamp, Zoned, tz::TimeZone};
use tindahan_app::{context::AppContext, rate_limit::RateLimiters};

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) limiters: Arc<RateLimiters>,

    /// Zone that report periods are anchored in.
    pub(crate) report_time_zone: TimeZone,

    /// Client addresses come from proxy headers rather than the socket peer.
    pub(crate) trust_proxy_headers: bool,
}

impl State {
    #[must_use]
    pub(crate) fn new(
        app: AppContext,
        limiters: Arc<RateLimiters>,
        report_time_zone: TimeZone,
    ) -> Self {
        Self {
            app,
            limiters,
            report_time_zone,
            trust_proxy_headers: false,
        }
    }

    #[must_use]
    pub(crate) fn with_trusted_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    /// Current time in the report time zone.
    #[must_use]
    pub(crate) fn report_now(&self) -> Zoned {
        Timestamp::now().to_zoned(self.report_time_zone.clone())
    }
}
