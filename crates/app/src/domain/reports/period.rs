//! Report periods and the time windows they cover.

use std::{fmt, str::FromStr};

use jiff::{Span, Zoned, civil::Date};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReportPeriod {
    #[default]
    Today,
    Week,
    Month,
    Year,
}

impl ReportPeriod {
    /// Value used in query strings and file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "Weekly",
            Self::Month => "Monthly",
            Self::Year => "Yearly",
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown report period `{0}`, expected today, week, month or year")]
pub struct UnknownReportPeriod(pub String);

impl FromStr for ReportPeriod {
    type Err = UnknownReportPeriod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(UnknownReportPeriod(value.to_string())),
        }
    }
}

/// A report period anchored at a point in time, in the report time zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWindow {
    pub period: ReportPeriod,

    /// When the report was requested.
    pub now: Zoned,

    /// Start of the period: start of day, Monday of this week, first of month or first of year.
    pub start: Zoned,
}

impl ReportWindow {
    /// # Errors
    ///
    /// Returns an error when the period start falls outside the supported date range.
    pub fn new(period: ReportPeriod, now: Zoned) -> Result<Self, jiff::Error> {
        let today = now.date();

        let start_date = match period {
            ReportPeriod::Today => today,
            ReportPeriod::Week => today.checked_sub(Span::new().days(i64::from(
                today.weekday().to_monday_zero_offset(),
            )))?,
            ReportPeriod::Month => today.first_of_month(),
            ReportPeriod::Year => today.first_of_year(),
        };

        let start = start_date.to_zoned(now.time_zone().clone())?;

        Ok(Self { period, now, start })
    }

    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start.date()
    }

    /// Earliest instant the chart for this period plots.
    ///
    /// The week and month charts are rolling (last seven and thirty days), and the year chart
    /// covers the last twelve calendar months, so they can reach back before [`Self::start`].
    ///
    /// # Errors
    ///
    /// Returns an error when that instant falls outside the supported date range.
    pub fn chart_start(&self) -> Result<Zoned, jiff::Error> {
        let today = self.now.date();

        let date = match self.period {
            ReportPeriod::Today => today,
            ReportPeriod::Week => today.checked_sub(Span::new().days(6))?,
            ReportPeriod::Month => today.checked_sub(Span::new().days(29))?,
            ReportPeriod::Year => today
                .first_of_month()
                .checked_sub(Span::new().months(11))?,
        };

        date.to_zoned(self.now.time_zone().clone())
    }
}
