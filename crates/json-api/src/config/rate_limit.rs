//! Rate Limit Config

use std::{num::NonZeroU32, time::Duration};

use clap::Args;
use tindahan_app::rate_limit::{RateLimitPolicy, RateLimitSettings};

/// Budgets for the named rate limiters.
#[derive(Debug, Args)]
pub struct RateLimitConfig {
    /// Authenticated API requests allowed per account per window
    #[arg(long, env = "API_RATE_LIMIT_MAX", default_value = "100")]
    pub api_rate_limit_max: NonZeroU32,

    /// Window length for the API limiter
    #[arg(long, env = "API_RATE_LIMIT_WINDOW_SECONDS", default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    pub api_rate_limit_window_seconds: u64,

    /// Register and login attempts allowed per client address per window
    #[arg(long, env = "AUTH_RATE_LIMIT_MAX", default_value = "10")]
    pub auth_rate_limit_max: NonZeroU32,

    /// Window length for the auth limiter
    #[arg(long, env = "AUTH_RATE_LIMIT_WINDOW_SECONDS", default_value = "300", value_parser = clap::value_parser!(u64).range(1..))]
    pub auth_rate_limit_window_seconds: u64,

    /// Token recovery requests allowed per client address per window
    #[arg(long, env = "PASSWORD_RESET_RATE_LIMIT_MAX", default_value = "3")]
    pub password_reset_rate_limit_max: NonZeroU32,

    /// Window length for the token recovery limiter
    #[arg(long, env = "PASSWORD_RESET_RATE_LIMIT_WINDOW_SECONDS", default_value = "3600", value_parser = clap::value_parser!(u64).range(1..))]
    pub password_reset_rate_limit_window_seconds: u64,

    /// E-mails allowed per recipient per window
    #[arg(long, env = "EMAIL_RATE_LIMIT_MAX", default_value = "10")]
    pub email_rate_limit_max: NonZeroU32,

    /// Window length for the e-mail limiter
    #[arg(long, env = "EMAIL_RATE_LIMIT_WINDOW_SECONDS", default_value = "3600", value_parser = clap::value_parser!(u64).range(1..))]
    pub email_rate_limit_window_seconds: u64,

    /// How often expired limiter entries are swept
    #[arg(long, env = "RATE_LIMIT_SWEEP_INTERVAL_SECONDS", default_value = "3600", value_parser = clap::value_parser!(u64).range(1..))]
    pub rate_limit_sweep_interval_seconds: u64,
}

impl RateLimitConfig {
    /// Limiter budgets as configured.
    #[must_use]
    pub fn settings(&self) -> RateLimitSettings {
        let policy = |max: NonZeroU32, window_seconds: u64| {
            RateLimitPolicy::new(max, Duration::from_secs(window_seconds))
        };

        RateLimitSettings {
            api: policy(self.api_rate_limit_max, self.api_rate_limit_window_seconds),
            auth: policy(self.auth_rate_limit_max, self.auth_rate_limit_window_seconds),
            password_reset: policy(
                self.password_reset_rate_limit_max,
                self.password_reset_rate_limit_window_seconds,
            ),
            email: policy(self.email_rate_limit_max, self.email_rate_limit_window_seconds),
        }
    }

    /// Interval between sweeps of expired entries.
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_sweep_interval_seconds)
    }
}
