//! Products service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::products::data::{MAX_AMOUNT, MAX_QUANTITY};

/// Business-rule failures detected before any write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProductValidationError {
    #[error("product name must not be empty")]
    EmptyName,

    #[error("product name is too long")]
    NameTooLong,

    #[error("product price must be greater than zero")]
    ZeroPrice,

    #[error("product price and cost must not exceed {max}", max = MAX_AMOUNT)]
    AmountTooLarge,

    #[error("product stock and threshold must not exceed {max}", max = MAX_QUANTITY)]
    QuantityTooLarge,
}

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product already exists")]
    AlreadyExists,

    #[error("product not found")]
    NotFound,

    #[error(transparent)]
    Validation(#[from] ProductValidationError),

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ProductsServiceError {
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
