//! The limiter instances used by the service.

use std::{num::NonZeroU32, sync::Arc, time::Duration};

use crate::rate_limit::{
    clock::{Clock, SystemClock},
    limiter::{RateLimitPolicy, RateLimiter},
    sweeper::{self, SweeperHandle},
};

const fn policy(max_requests: u32, window_secs: u64) -> RateLimitPolicy {
    let max_requests = match NonZeroU32::new(max_requests) {
        Some(max_requests) => max_requests,
        None => NonZeroU32::MIN,
    };

    RateLimitPolicy::new(max_requests, Duration::from_secs(window_secs))
}

/// Budgets for each named limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    /// General authenticated API traffic, per account.
    pub api: RateLimitPolicy,

    /// Registration and login attempts, per client address.
    pub auth: RateLimitPolicy,

    /// Token recovery requests, per client address.
    pub password_reset: RateLimitPolicy,

    /// Outbound e-mail, per recipient.
    pub email: RateLimitPolicy,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            api: policy(100, 60),
            auth: policy(10, 5 * 60),
            password_reset: policy(3, 60 * 60),
            email: policy(10, 60 * 60),
        }
    }
}

/// Independent limiter namespaces, created once at startup and shared by handle.
#[derive(Debug, Clone)]
pub struct RateLimiters {
    pub api: Arc<RateLimiter>,
    pub auth: Arc<RateLimiter>,
    pub password_reset: Arc<RateLimiter>,
    pub email: Arc<RateLimiter>,
}

impl RateLimiters {
    #[must_use]
    pub fn new(settings: RateLimitSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(settings: RateLimitSettings, clock: Arc<dyn Clock>) -> Self {
        let limiter = |name: &'static str, policy: RateLimitPolicy| {
            Arc::new(RateLimiter::with_clock(name, policy, clock.clone()))
        };

        Self {
            api: limiter("api", settings.api),
            auth: limiter("auth", settings.auth),
            password_reset: limiter("password_reset", settings.password_reset),
            email: limiter("email", settings.email),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RateLimiter> {
        [&self.api, &self.auth, &self.password_reset, &self.email]
            .into_iter()
            .map(AsRef::as_ref)
    }

    /// Sweep expired entries from every limiter.
    pub fn sweep(&self) -> usize {
        self.iter().map(RateLimiter::sweep).sum()
    }

    /// Sweep on a fixed interval until the returned handle is stopped or dropped.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> SweeperHandle {
        sweeper::spawn(Arc::downgrade(self), every)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use crate::rate_limit::ManualClock;

    use super::*;

    #[test]
    fn default_budgets() {
        let settings = RateLimitSettings::default();

        assert_eq!(settings.api.max_requests.get(), 100);
        assert_eq!(settings.api.window, Duration::from_secs(60));
        assert_eq!(settings.auth.max_requests.get(), 10);
        assert_eq!(settings.auth.window, Duration::from_secs(300));
        assert_eq!(settings.password_reset.max_requests.get(), 3);
        assert_eq!(settings.password_reset.window, Duration::from_secs(3_600));
        assert_eq!(settings.email.max_requests.get(), 10);
        assert_eq!(settings.email.window, Duration::from_secs(3_600));
    }

    #[test]
    fn named_limiters_are_separate_namespaces() {
        let limiters = RateLimiters::new(RateLimitSettings::default());

        for _ in 0..3 {
            limiters.password_reset.check("ip:1.1.1.1");
        }

        assert!(limiters.password_reset.check("ip:1.1.1.1").limited);
        assert!(!limiters.auth.check("ip:1.1.1.1").limited);
        assert_eq!(limiters.auth.name(), "auth");
    }

    #[test]
    fn sweep_covers_every_limiter() {
        let clock = Arc::new(ManualClock::new(Timestamp::UNIX_EPOCH));
        let limiters = RateLimiters::with_clock(RateLimitSettings::default(), clock.clone());

        limiters.api.check("a");
        limiters.auth.check("a");
        limiters.email.check("a");

        clock.advance(Duration::from_secs(2 * 60 * 60));

        assert_eq!(limiters.sweep(), 3);
    }
}
