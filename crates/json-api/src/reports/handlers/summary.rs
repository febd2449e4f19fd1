//! Sales Summary Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use tindahan_app::domain::reports::summary::{SalesSummary, TopProduct};

use crate::{
    extensions::*,
    reports::{errors::into_status_error, handlers::requested_window},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TopProductResponse {
    pub product_name: String,
    pub quantity: u64,

    /// Revenue in centavos
    pub revenue: u64,
}

impl From<TopProduct> for TopProductResponse {
    fn from(product: TopProduct) -> Self {
        Self {
            product_name: product.product_name,
            quantity: product.quantity,
            revenue: product.revenue,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SummaryResponse {
    pub period: String,
    pub label: String,

    /// First day of the period
    pub start_date: String,

    /// Gross sales in centavos
    pub gross: u64,

    /// Net profit in centavos
    pub profit: i64,

    /// Number of active sales
    pub count: u64,

    /// Mean sale value in centavos
    pub average: u64,

    pub top_products: Vec<TopProductResponse>,
}

/// Sales Summary Handler
#[endpoint(
    tags("reports"),
    summary = "Sales Summary",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Summary for the period"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown period"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    period: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<SummaryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;
    let window = requested_window(state, period)?;

    let period = window.period;
    let start_date = window.start_date().to_string();

    let SalesSummary {
        gross,
        profit,
        count,
        average,
        top_products,
    } = state
        .app
        .reports
        .summary(account, window)
        .await
        .map_err(into_status_error)?;

    Ok(Json(SummaryResponse {
        period: period.as_str().to_string(),
        label: period.label().to_string(),
        start_date,
        gross,
        profit,
        count,
        average,
        top_products: top_products.into_iter().map(Into::into).collect(),
    }))
}
