//! Test Helpers

use crate::domain::products::data::{DEFAULT_CATEGORY, DEFAULT_LOW_STOCK_THRESHOLD, ProductDetails};

/// Product details with the default category and threshold.
pub(crate) fn product_details(name: &str, price: u64, cost: u64, stock: u32) -> ProductDetails {
    ProductDetails {
        name: name.to_string(),
        category: DEFAULT_CATEGORY.to_string(),
        price,
        cost,
        stock,
        low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
    }
}
