//! Product Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod low_stock;
pub(crate) mod update;

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tindahan_app::domain::products::{
    data::{DEFAULT_LOW_STOCK_THRESHOLD, ProductDetails},
    records::ProductRecord,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    pub uuid: Uuid,
    pub name: String,
    pub category: String,

    /// Selling price in centavos
    pub price: u64,

    /// Unit cost in centavos
    pub cost: u64,

    pub stock: u32,
    pub low_stock_threshold: u32,

    /// Stock is at or below the threshold
    pub low_stock: bool,

    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        ProductResponse {
            low_stock: product.is_low_stock(),
            uuid: product.uuid.into(),
            name: product.name,
            category: product.category,
            price: product.price,
            cost: product.cost,
            stock: product.stock,
            low_stock_threshold: product.low_stock_threshold,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
            deleted_at: product.deleted_at.as_ref().map(ToString::to_string),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    pub products: Vec<ProductResponse>,
}

impl From<Vec<ProductRecord>> for ProductsResponse {
    fn from(products: Vec<ProductRecord>) -> Self {
        Self {
            products: products.into_iter().map(Into::into).collect(),
        }
    }
}

/// Editable product fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductDetailsRequest {
    pub name: String,

    /// Defaults to "Others"
    #[serde(default)]
    pub category: Option<String>,

    /// Selling price in centavos
    pub price: u64,

    /// Unit cost in centavos
    #[serde(default)]
    pub cost: u64,

    #[serde(default)]
    pub stock: u32,

    /// Defaults to 5
    #[serde(default)]
    pub low_stock_threshold: Option<u32>,
}

impl From<ProductDetailsRequest> for ProductDetails {
    fn from(request: ProductDetailsRequest) -> Self {
        ProductDetails {
            name: request.name,
            category: request.category.unwrap_or_default(),
            price: request.price,
            cost: request.cost,
            stock: request.stock,
            low_stock_threshold: request
                .low_stock_threshold
                .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use tindahan_app::domain::products::records::{ProductRecord, ProductUuid};

    pub(super) fn make_product(uuid: ProductUuid, stock: u32) -> ProductRecord {
        ProductRecord {
            uuid,
            name: "Coke Mismo".to_string(),
            category: "Drinks".to_string(),
            price: 2_000,
            cost: 1_500,
            stock,
            low_stock_threshold: 5,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        }
    }
}
