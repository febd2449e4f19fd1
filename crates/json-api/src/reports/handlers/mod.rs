//! Report Handlers

pub(crate) mod chart;
pub(crate) mod dashboard;
pub(crate) mod export;
pub(crate) mod summary;

use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use tindahan_app::domain::reports::period::ReportWindow;

use crate::{extensions::*, state::State};

/// Window for the `period` query parameter, anchored at the current time in the report zone.
fn requested_window(
    state: &State,
    period: QueryParam<String, false>,
) -> Result<ReportWindow, StatusError> {
    let period = period.into_report_period()?;

    ReportWindow::new(period, state.report_now()).or_500("failed to compute report window")
}
