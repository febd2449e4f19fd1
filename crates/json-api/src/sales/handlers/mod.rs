//! Sale Handlers

pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod void;

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tindahan_app::domain::sales::records::{SaleItemRecord, SaleRecord};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SaleItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,

    /// Product name when sold
    pub product_name: String,

    pub quantity: u32,

    /// Unit price when sold, in centavos
    pub price: u64,

    /// Unit cost when sold, in centavos
    pub cost: u64,
}

impl From<SaleItemRecord> for SaleItemResponse {
    fn from(item: SaleItemRecord) -> Self {
        Self {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.price,
            cost: item.cost,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SaleResponse {
    pub uuid: Uuid,

    /// Total in centavos, zero once voided
    pub total: u64,

    /// Profit in centavos, zero once voided
    pub profit: i64,

    /// `active` or `voided`
    pub status: String,

    pub items: Vec<SaleItemResponse>,
    pub created_at: String,
    pub voided_at: Option<String>,
}

impl From<SaleRecord> for SaleResponse {
    fn from(sale: SaleRecord) -> Self {
        Self {
            uuid: sale.uuid.into(),
            total: sale.total,
            profit: sale.profit,
            status: sale.status.to_string(),
            items: sale.items.into_iter().map(Into::into).collect(),
            created_at: sale.created_at.to_string(),
            voided_at: sale.voided_at.as_ref().map(ToString::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use tindahan_app::domain::{
        products::records::ProductUuid,
        sales::records::{SaleItemRecord, SaleItemUuid, SaleRecord, SaleStatus, SaleUuid},
    };

    pub(super) fn make_sale(uuid: SaleUuid, status: SaleStatus) -> SaleRecord {
        let voided = status == SaleStatus::Voided;

        SaleRecord {
            uuid,
            total: if voided { 0 } else { 2_500 },
            profit: if voided { 0 } else { 1_000 },
            status,
            items: vec![SaleItemRecord {
                uuid: SaleItemUuid::new(),
                sale_uuid: uuid,
                product_uuid: ProductUuid::new(),
                product_name: "Coke Mismo".to_string(),
                quantity: 2,
                price: 1_000,
                cost: 600,
                created_at: Timestamp::UNIX_EPOCH,
            }],
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            voided_at: voided.then_some(Timestamp::UNIX_EPOCH),
        }
    }
}
