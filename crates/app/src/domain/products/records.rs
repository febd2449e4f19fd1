//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub category: String,
    pub price: u64,
    pub cost: u64,
    pub stock: u32,
    pub low_stock_threshold: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl ProductRecord {
    /// Stock at or below the product's threshold.
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }

    /// Selling value of the units on hand.
    #[must_use]
    pub fn inventory_value(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.stock))
    }
}
