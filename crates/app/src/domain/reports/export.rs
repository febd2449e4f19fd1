//! CSV product sales report.

use rust_decimal::Decimal;

use crate::domain::{products::records::ProductUuid, reports::period::ReportWindow};

/// Column header of the product table.
pub const CSV_HEADER: &str = "ID,Name,Price,Stock,Sold,Sales,Profit";

/// A live product with what it sold in the report window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSalesRow {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub stock: u32,
    pub sold: u64,
    pub revenue: u64,
    pub profit: i64,
}

/// Minor units rendered with two decimals.
fn money(minor_units: i128) -> Decimal {
    Decimal::try_from_i128_with_scale(minor_units, 2).unwrap_or(Decimal::MAX)
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// File name offered for download, e.g. `sales-report-week-2026-03-09.csv`.
#[must_use]
pub fn csv_file_name(window: &ReportWindow) -> String {
    format!(
        "sales-report-{}-{}.csv",
        window.period.as_str(),
        window.start_date()
    )
}

/// Render the report. Rows are written in the order given.
#[must_use]
pub fn render_csv(window: &ReportWindow, rows: &[ProductSalesRow]) -> String {
    let mut lines = vec![
        "# Product Sales Report".to_string(),
        format!("# Period: {}", window.period.label()),
        format!("# Date: {}", window.start_date()),
        "# Generated by Tindahan".to_string(),
        String::new(),
        CSV_HEADER.to_string(),
    ];

    let mut sold: u64 = 0;
    let mut revenue: i128 = 0;
    let mut profit: i128 = 0;

    for row in rows {
        lines.push(format!(
            "{},{},{},{},{},{},{}",
            row.uuid,
            quoted(&row.name),
            money(i128::from(row.price)),
            row.stock,
            row.sold,
            money(i128::from(row.revenue)),
            money(i128::from(row.profit)),
        ));

        sold = sold.saturating_add(row.sold);
        revenue += i128::from(row.revenue);
        profit += i128::from(row.profit);
    }

    lines.push(String::new());
    lines.push(format!(
        ",,TOTALS,,{sold},{},{}",
        money(revenue),
        money(profit)
    ));

    lines.join("\n")
}
