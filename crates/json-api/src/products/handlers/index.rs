//! Product Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use tindahan_app::domain::products::data::ProductFilter;

use crate::{
    extensions::*,
    products::{errors::into_status_error, handlers::ProductsResponse},
    state::State,
};

/// Product Index Handler
///
/// Lists live products, newest first.
#[endpoint(
    tags("products"),
    summary = "List Products",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    search: QueryParam<String, false>,
    category: QueryParam<String, false>,
    in_stock: QueryParam<bool, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;

    let filter = ProductFilter {
        search: non_blank(search.into_inner()),
        category: non_blank(category.into_inner()),
        in_stock_only: in_stock.into_inner().unwrap_or(false),
    };

    let products = state
        .app
        .products
        .list_products(account, filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(products.into()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
