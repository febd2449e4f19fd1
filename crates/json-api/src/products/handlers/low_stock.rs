//! Low Stock Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    products::{errors::into_status_error, handlers::ProductsResponse},
    state::State,
};

/// Low Stock Handler
///
/// Products whose stock is at or below their threshold.
#[endpoint(
    tags("products"),
    summary = "List Low-Stock Products",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;

    let products = state
        .app
        .products
        .list_low_stock_products(account)
        .await
        .map_err(into_status_error)?;

    Ok(Json(products.into()))
}
