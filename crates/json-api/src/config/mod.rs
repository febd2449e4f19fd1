//! Server configuration module

use clap::Parser;

use crate::config::{
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    rate_limit::RateLimitConfig,
    reports::ReportsConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod rate_limit;
pub(crate) mod reports;
pub(crate) mod server;

/// Tindahan JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "tindahan-json", about = "Tindahan JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request observability settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Rate limiter budgets.
    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    /// Report settings.
    #[command(flatten)]
    pub reports: ReportsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const REQUIRED: [&str; 3] = ["tindahan-json", "--database-url", "postgres://localhost/tindahan"];

    #[test]
    fn defaults_apply_when_only_database_is_given() -> TestResult {
        let config = ServerConfig::try_parse_from(REQUIRED)?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698");
        assert_eq!(config.observability.slow_request_threshold_ms, 1_000);
        assert_eq!(config.rate_limit.api_rate_limit_max.get(), 100);
        assert_eq!(config.rate_limit.rate_limit_sweep_interval_seconds, 3_600);
        assert_eq!(config.reports.report_timezone.iana_name(), Some("UTC"));
        assert!(!config.server.trust_proxy_headers);

        Ok(())
    }

    #[test]
    fn proxy_headers_can_be_trusted() -> TestResult {
        let config =
            ServerConfig::try_parse_from(REQUIRED.into_iter().chain(["--trust-proxy-headers"]))?;

        assert!(config.server.trust_proxy_headers);

        Ok(())
    }

    #[test]
    fn rate_limits_can_be_overridden() -> TestResult {
        let config = ServerConfig::try_parse_from(
            REQUIRED
                .into_iter()
                .chain(["--auth-rate-limit-max", "3", "--auth-rate-limit-window-seconds", "60"]),
        )?;

        let settings = config.rate_limit.settings();

        assert_eq!(settings.auth.max_requests.get(), 3);
        assert_eq!(settings.auth.window.as_secs(), 60);
        assert_eq!(settings.api.max_requests.get(), 100);

        Ok(())
    }

    #[test]
    fn zero_budget_is_rejected() {
        let result = ServerConfig::try_parse_from(
            REQUIRED.into_iter().chain(["--api-rate-limit-max", "0"]),
        );

        assert!(result.is_err(), "a zero request budget must not parse");
    }

    #[test]
    fn unknown_time_zone_is_rejected() {
        let result = ServerConfig::try_parse_from(
            REQUIRED
                .into_iter()
                .chain(["--report-timezone", "Mars/Olympus_Mons"]),
        );

        assert!(result.is_err(), "unknown time zones must not parse");
    }
}
