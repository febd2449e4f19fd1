//! Dashboard Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use tindahan_app::domain::reports::summary::Dashboard;

use crate::{extensions::*, reports::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DashboardResponse {
    pub product_count: u64,
    pub low_stock_count: u64,

    /// Selling value of all stock on hand, in centavos
    pub inventory_value: u64,

    /// Sales so far today, in centavos
    pub today_sales: u64,

    /// Profit so far this month, in centavos
    pub month_profit: i64,
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            product_count: dashboard.product_count,
            low_stock_count: dashboard.low_stock_count,
            inventory_value: dashboard.inventory_value,
            today_sales: dashboard.today_sales,
            month_profit: dashboard.month_profit,
        }
    }
}

/// Dashboard Handler
#[endpoint(
    tags("reports"),
    summary = "Dashboard",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<DashboardResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;

    let dashboard = state
        .app
        .reports
        .dashboard(account, state.report_now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(dashboard.into()))
}
