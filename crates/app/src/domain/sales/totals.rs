//! Sale totals.

use thiserror::Error;

/// A sold line with the prices captured at sale time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub price: u64,
    pub cost: u64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleTotals {
    pub total: u64,
    pub profit: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("sale amounts overflow")]
pub struct AmountOverflow;

/// Compute a sale's total and profit.
///
/// Both results must fit the signed 64-bit columns they are stored in.
///
/// # Errors
///
/// Returns [`AmountOverflow`] if any intermediate value leaves that range.
pub fn sale_totals(lines: &[PricedLine]) -> Result<SaleTotals, AmountOverflow> {
    let mut total: i64 = 0;
    let mut profit: i64 = 0;

    for line in lines {
        let price = i64::try_from(line.price).map_err(|_ignored| AmountOverflow)?;
        let cost = i64::try_from(line.cost).map_err(|_ignored| AmountOverflow)?;
        let quantity = i64::from(line.quantity);

        let line_total = price.checked_mul(quantity).ok_or(AmountOverflow)?;
        let line_profit = price
            .checked_sub(cost)
            .and_then(|margin| margin.checked_mul(quantity))
            .ok_or(AmountOverflow)?;

        total = total.checked_add(line_total).ok_or(AmountOverflow)?;
        profit = profit.checked_add(line_profit).ok_or(AmountOverflow)?;
    }

    Ok(SaleTotals {
        total: u64::try_from(total).map_err(|_ignored| AmountOverflow)?,
        profit,
    })
}
