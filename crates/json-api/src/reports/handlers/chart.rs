//! Sales Chart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use tindahan_app::domain::reports::chart::ChartSeries;

use crate::{
    extensions::*,
    reports::{errors::into_status_error, handlers::requested_window},
    state::State,
};

/// Parallel series: `sales[i]` and `profits[i]` belong to `labels[i]`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ChartResponse {
    pub period: String,
    pub labels: Vec<String>,

    /// Sales per bucket in centavos
    pub sales: Vec<u64>,

    /// Profit per bucket in centavos
    pub profits: Vec<i64>,
}

/// Sales Chart Handler
#[endpoint(
    tags("reports"),
    summary = "Sales Chart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Chart series for the period"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown period"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    period: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ChartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;
    let window = requested_window(state, period)?;
    let period = window.period;

    let ChartSeries {
        labels,
        sales,
        profits,
    } = state
        .app
        .reports
        .chart(account, window)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ChartResponse {
        period: period.as_str().to_string(),
        labels,
        sales,
        profits,
    }))
}
