//! Void Sale Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{
    extensions::*,
    sales::{errors::into_status_error, handlers::SaleResponse},
    state::State,
};

/// Void Sale Handler
///
/// Voids the sale and returns its stock. Voiding a voided sale returns it unchanged.
#[endpoint(
    tags("sales"),
    summary = "Void Sale",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Sale voided"),
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
        .void_sale(account, sale.into_inner().into())
        .await
        .map_err(into_status_error)?;

    info!(account_uuid = %account, sale_uuid = %sale.uuid, "sale voided");

    Ok(Json(sale.into()))
}
