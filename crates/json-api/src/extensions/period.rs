//! Report period query parsing.

use salvo::{oapi::extract::QueryParam, prelude::StatusError};
use tindahan_app::domain::reports::period::ReportPeriod;

use crate::extensions::*;

pub(crate) trait ReportPeriodExt {
    /// The requested period, `today` when absent.
    fn into_report_period(self) -> Result<ReportPeriod, StatusError>;
}

impl ReportPeriodExt for QueryParam<String, false> {
    fn into_report_period(self) -> Result<ReportPeriod, StatusError> {
        self.into_inner()
            .map(|value| value.parse::<ReportPeriod>())
            .transpose()
            .or_400("period must be one of today, week, month, year")
            .map(Option::unwrap_or_default)
    }
}
