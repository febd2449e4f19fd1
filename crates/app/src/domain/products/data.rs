//! Products Data

use crate::domain::products::{errors::ProductValidationError, records::ProductUuid};

/// Category assigned when none is given.
pub const DEFAULT_CATEGORY: &str = "Others";

/// Threshold used when a product does not set one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

/// Longest accepted product name, in characters.
pub const MAX_NAME_CHARS: usize = 200;

/// Largest price or cost, bounded by the `BIGINT` columns.
pub const MAX_AMOUNT: u64 = i64::MAX.unsigned_abs();

/// Largest stock level or threshold, bounded by the `INTEGER` columns.
pub const MAX_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Editable product fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetails {
    pub name: String,
    pub category: String,

    /// Selling price in minor units.
    pub price: u64,

    /// Unit cost in minor units.
    pub cost: u64,

    pub stock: u32,
    pub low_stock_threshold: u32,
}

impl ProductDetails {
    /// Trim text fields, apply the default category, and check the business rules.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductValidationError`] for a blank or overlong name, a zero price, or an
    /// amount or quantity the database columns cannot hold.
    pub fn normalised(self) -> Result<Self, ProductValidationError> {
        let name = self.name.trim().to_string();
        let category = self.category.trim();

        if name.is_empty() {
            return Err(ProductValidationError::EmptyName);
        }

        if name.chars().count() > MAX_NAME_CHARS {
            return Err(ProductValidationError::NameTooLong);
        }

        if self.price == 0 {
            return Err(ProductValidationError::ZeroPrice);
        }

        if self.price > MAX_AMOUNT || self.cost > MAX_AMOUNT {
            return Err(ProductValidationError::AmountTooLarge);
        }

        if self.stock > MAX_QUANTITY || self.low_stock_threshold > MAX_QUANTITY {
            return Err(ProductValidationError::QuantityTooLarge);
        }

        Ok(Self {
            name,
            category: if category.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category.to_string()
            },
            ..self
        })
    }
}

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub details: ProductDetails,
}

/// Product listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,

    /// Exact category.
    pub category: Option<String>,

    /// Only products that can currently be sold.
    pub in_stock_only: bool,
}
