//! Sale Index Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use tindahan_app::domain::sales::data::{DEFAULT_SALES_LIMIT, SalesQuery};

use crate::{
    extensions::*,
    sales::{errors::into_status_error, handlers::SaleResponse},
    state::State,
};

const MAX_SALES_LIMIT: u32 = 500;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SalesResponse {
    pub sales: Vec<SaleResponse>,
}

/// Sale Index Handler
///
/// Recent sales with their items, newest first.
#[endpoint(
    tags("sales"),
    summary = "List Sales",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    since: QueryParam<String, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<SalesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;

    let since = since
        .into_inner()
        .map(|value| value.parse::<Timestamp>())
        .transpose()
        .or_400("since must be an RFC 3339 timestamp")?;

    let query = SalesQuery {
        since,
        limit: limit
            .into_inner()
            .unwrap_or(DEFAULT_SALES_LIMIT)
            .clamp(1, MAX_SALES_LIMIT),
    };

    let sales = state
        .app
        .sales
        .list_sales(account, query)
        .await
        .map_err(into_status_error)?;

    Ok(Json(SalesResponse {
        sales: sales.into_iter().map(Into::into).collect(),
    }))
}
