//! Sale Errors

use salvo::http::StatusError;
use tracing::error;

use tindahan_app::domain::sales::{SalesServiceError, data::MAX_LINE_QUANTITY};

pub(crate) fn into_status_error(error: SalesServiceError) -> StatusError {
    match error {
        SalesServiceError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        SalesServiceError::InvalidQuantity { .. } => StatusError::bad_request()
            .brief(format!("Every quantity must be between 1 and {MAX_LINE_QUANTITY}")),
        SalesServiceError::InvalidReference
        | SalesServiceError::MissingRequiredData
        | SalesServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid sale payload")
        }
        SalesServiceError::AmountOverflow(_) => {
            StatusError::unprocessable_entity().brief("Sale amounts are too large")
        }
        SalesServiceError::ProductNotFound(product) => {
            StatusError::not_found().brief(format!("Product {product} not found"))
        }
        SalesServiceError::NotFound => StatusError::not_found().brief("Sale not found"),
        SalesServiceError::InsufficientStock {
            product,
            requested,
            available,
        } => StatusError::conflict().brief(format!(
            "Insufficient stock for product {product}: requested {requested}, available {available}"
        )),
        SalesServiceError::AlreadyExists => StatusError::conflict().brief("Sale already exists"),
        SalesServiceError::StockNotRestored => {
            error!("void rolled back: stock could not be restored");

            StatusError::internal_server_error()
        }
        SalesServiceError::Sql(source) => {
            error!("failed to access sales: {source}");

            StatusError::internal_server_error()
        }
    }
}
