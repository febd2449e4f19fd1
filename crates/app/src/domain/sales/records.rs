//! Sale Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::products::records::ProductUuid, uuids::TypedUuid};

/// Sale UUID
pub type SaleUuid = TypedUuid<SaleRecord>;

/// Sale Item UUID
pub type SaleItemUuid = TypedUuid<SaleItemRecord>;

/// Lifecycle of a sale. The only transition is `Active -> Voided`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaleStatus {
    Active,
    Voided,
}

impl SaleStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Voided => "voided",
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown sale status: {0}")]
pub struct UnknownSaleStatus(String);

impl FromStr for SaleStatus {
    type Err = UnknownSaleStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "voided" => Ok(Self::Voided),
            other => Err(UnknownSaleStatus(other.to_string())),
        }
    }
}

/// Sale Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRecord {
    pub uuid: SaleUuid,

    /// Sum of `price * quantity` over the items, zero once voided.
    pub total: u64,

    /// Sum of `(price - cost) * quantity`, negative when sold below cost.
    pub profit: i64,

    pub status: SaleStatus,
    pub items: Vec<SaleItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub voided_at: Option<Timestamp>,
}

impl SaleRecord {
    #[must_use]
    pub fn is_voided(&self) -> bool {
        self.status == SaleStatus::Voided
    }

    /// Units sold across every line.
    #[must_use]
    pub fn units(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// Sale Item Record. Name, price and cost are copied from the product when sold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleItemRecord {
    pub uuid: SaleItemUuid,
    pub sale_uuid: SaleUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub quantity: u32,
    pub price: u64,
    pub cost: u64,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!("active".parse::<SaleStatus>().ok(), Some(SaleStatus::Active));
        assert_eq!("voided".parse::<SaleStatus>().ok(), Some(SaleStatus::Voided));
        assert_eq!(SaleStatus::Voided.to_string(), "voided");
        assert!("refunded".parse::<SaleStatus>().is_err());
    }
}
