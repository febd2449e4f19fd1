//! Get Sale Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    sales::{errors::into_status_error, handlers::SaleResponse},
    state::State,
};

/// Get Sale Handler
#[endpoint(
    tags("sales"),
    summary = "Get Sale",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Sale found"),
        (status_code = StatusCode::NOT_FOUND, description = "Sale not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    sale: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<SaleResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;

    let sale = state
        .app
        .sales
        .get_sale(account, sale.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(sale.into()))
}
