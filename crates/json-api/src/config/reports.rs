//! Reports Config

use clap::Args;
use jiff::tz::TimeZone;

/// Report settings.
#[derive(Debug, Args)]
pub struct ReportsConfig {
    /// IANA time zone that report periods (today, week, month, year) are computed in
    #[arg(long, env = "REPORT_TIMEZONE", default_value = "UTC", value_parser = parse_time_zone)]
    pub report_timezone: TimeZone,
}

fn parse_time_zone(name: &str) -> Result<TimeZone, jiff::Error> {
    TimeZone::get(name)
}
