//! Sales service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    products::records::ProductUuid,
    sales::{data::MAX_LINE_QUANTITY, totals::AmountOverflow},
};

#[derive(Debug, Error)]
pub enum SalesServiceError {
    #[error("sale already exists")]
    AlreadyExists,

    #[error("sale not found")]
    NotFound,

    #[error("cart is empty")]
    EmptyCart,

    #[error("quantity for product {product} must be between 1 and {max}", max = MAX_LINE_QUANTITY)]
    InvalidQuantity { product: ProductUuid },

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("insufficient stock for product {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: ProductUuid,
        requested: u32,
        available: u32,
    },

    #[error(transparent)]
    AmountOverflow(#[from] AmountOverflow),

    #[error("stock could not be restored for every product in the sale")]
    StockNotRestored,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for SalesServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
