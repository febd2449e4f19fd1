//! Report summaries.

/// Number of products listed in a summary.
pub const TOP_PRODUCTS: u32 = 5;

/// A best-selling product, grouped by the name it was sold under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopProduct {
    pub product_name: String,
    pub quantity: u64,
    pub revenue: u64,
}

/// Totals over active sales in a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SalesTotals {
    pub gross: u64,
    pub profit: i64,
    pub count: u64,
}

impl SalesTotals {
    /// Mean sale value, rounded half up. Zero without sales.
    #[must_use]
    pub fn average(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }

        self.gross.saturating_add(self.count / 2) / self.count
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesSummary {
    pub gross: u64,
    pub profit: i64,
    pub count: u64,
    pub average: u64,
    pub top_products: Vec<TopProduct>,
}

impl SalesSummary {
    #[must_use]
    pub fn new(totals: SalesTotals, top_products: Vec<TopProduct>) -> Self {
        Self {
            gross: totals.gross,
            profit: totals.profit,
            count: totals.count,
            average: totals.average(),
            top_products,
        }
    }
}

/// Catalogue figures, independent of any period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryTotals {
    pub product_count: u64,
    pub low_stock_count: u64,
    pub inventory_value: u64,
}

/// Landing page numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dashboard {
    pub product_count: u64,
    pub low_stock_count: u64,
    pub inventory_value: u64,
    pub today_sales: u64,
    pub month_profit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rounds_half_up() {
        let totals = SalesTotals {
            gross: 1_001,
            profit: 0,
            count: 2,
        };

        assert_eq!(totals.average(), 501);
    }

    #[test]
    fn average_without_sales_is_zero() {
        assert_eq!(SalesTotals::default().average(), 0);
    }
}
