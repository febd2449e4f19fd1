//! Sales Data

use jiff::Timestamp;

use crate::domain::{products::records::ProductUuid, sales::records::SaleUuid};

/// Number of sales returned when a listing does not ask for a limit.
pub const DEFAULT_SALES_LIMIT: u32 = 50;

/// Largest quantity a single cart line may carry, bounded by the `INTEGER` column.
pub const MAX_LINE_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// One cart line: a product and how many units are being sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
}

impl CartLine {
    /// `1..=MAX_LINE_QUANTITY`
    #[must_use]
    pub fn has_valid_quantity(&self) -> bool {
        (1..=MAX_LINE_QUANTITY).contains(&self.quantity)
    }
}

/// New Sale Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub uuid: SaleUuid,
    pub lines: Vec<CartLine>,
}

/// Sale listing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesQuery {
    /// Only sales recorded at or after this instant.
    pub since: Option<Timestamp>,

    pub limit: u32,
}

impl Default for SalesQuery {
    fn default() -> Self {
        Self {
            since: None,
            limit: DEFAULT_SALES_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: u32) -> CartLine {
        CartLine {
            product_uuid: ProductUuid::new(),
            quantity,
        }
    }

    #[test]
    fn quantity_must_fit_the_stock_column() {
        assert!(!line(0).has_valid_quantity());
        assert!(line(1).has_valid_quantity());
        assert!(line(MAX_LINE_QUANTITY).has_valid_quantity());
        assert!(!line(MAX_LINE_QUANTITY + 1).has_valid_quantity());
        assert!(!line(3_000_000_000).has_valid_quantity());
    }
}
