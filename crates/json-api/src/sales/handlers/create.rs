//! Record Sale Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use tindahan_app::domain::sales::{
    data::{CartLine, NewSale},
    records::SaleUuid,
};

use crate::{
    extensions::*,
    sales::{errors::into_status_error, handlers::SaleResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineRequest {
    pub product_uuid: Uuid,
    pub quantity: u32,
}

/// Record Sale Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateSaleRequest {
    /// Client-chosen UUID; generated when absent
    #[serde(default)]
    pub uuid: Option<Uuid>,

    pub items: Vec<CartLineRequest>,
}

impl From<CreateSaleRequest> for NewSale {
    fn from(request: CreateSaleRequest) -> Self {
        NewSale {
            uuid: request.uuid.map_or_else(SaleUuid::new, SaleUuid::from),
            lines: request
                .items
                .into_iter()
                .map(|line| CartLine {
                    product_uuid: line.product_uuid.into(),
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

/// Record Sale Handler
///
/// Checks out a cart: takes stock for every line and records the sale, or changes nothing.
#[endpoint(
    tags("sales"),
    summary = "Record Sale",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Sale recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart or invalid quantity"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::CONFLICT, description = "Insufficient stock"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Amounts too large"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateSaleRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SaleResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.account_uuid_or_401()?;

    let sale = state
        .app
        .sales
        .record_sale(account, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    info!(
        account_uuid = %account,
        sale_uuid = %sale.uuid,
        total = sale.total,
        items = sale.items.len(),
        "sale recorded"
    );

    res.add_header(LOCATION, format!("/sales/{}", sale.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(sale.into()))
}
