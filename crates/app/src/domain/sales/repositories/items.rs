//! Sale Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    database::columns::{amount_param, quantity_param, try_get_amount, try_get_quantity},
    domain::{
        products::records::ProductUuid,
        sales::records::{SaleItemRecord, SaleItemUuid, SaleUuid},
    },
};

const CREATE_SALE_ITEMS_SQL: &str = include_str!("../sql/create_sale_items.sql");
const GET_SALE_ITEMS_SQL: &str = include_str!("../sql/get_sale_items.sql");

/// A line ready to be written, with its product snapshot.
#[derive(Debug, Clone)]
pub(crate) struct NewSaleItem {
    pub(crate) uuid: SaleItemUuid,
    pub(crate) product_uuid: ProductUuid,
    pub(crate) product_name: String,
    pub(crate) quantity: u32,
    pub(crate) price: u64,
    pub(crate) cost: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSaleItemsRepository;

impl PgSaleItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert every item of a sale in one statement.
    pub(crate) async fn create_sale_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale: SaleUuid,
        items: &[NewSaleItem],
    ) -> Result<Vec<SaleItemRecord>, sqlx::Error> {
        let mut uuids = Vec::with_capacity(items.len());
        let mut products = Vec::with_capacity(items.len());
        let mut names = Vec::with_capacity(items.len());
        let mut quantities = Vec::with_capacity(items.len());
        let mut prices = Vec::with_capacity(items.len());
        let mut costs = Vec::with_capacity(items.len());

        for item in items {
            uuids.push(item.uuid.into_uuid());
            products.push(item.product_uuid.into_uuid());
            names.push(item.product_name.clone());
            quantities.push(quantity_param(item.quantity, "quantity")?);
            prices.push(amount_param(item.price, "price")?);
            costs.push(amount_param(item.cost, "cost")?);
        }

        let mut created = query_as::<Postgres, SaleItemRecord>(CREATE_SALE_ITEMS_SQL)
            .bind(sale.into_uuid())
            .bind(uuids)
            .bind(products)
            .bind(names)
            .bind(quantities)
            .bind(prices)
            .bind(costs)
            .fetch_all(&mut **tx)
            .await?;

        // Item UUIDs are time ordered, so this restores cart order.
        created.sort_by_key(|item| item.uuid);

        Ok(created)
    }

    /// Items of every listed sale, oldest first.
    pub(crate) async fn get_sale_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sales: &[SaleUuid],
    ) -> Result<Vec<SaleItemRecord>, sqlx::Error> {
        let sales: Vec<Uuid> = sales.iter().map(|sale| sale.into_uuid()).collect();

        query_as::<Postgres, SaleItemRecord>(GET_SALE_ITEMS_SQL)
            .bind(sales)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for SaleItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: SaleItemUuid::from_uuid(row.try_get("uuid")?),
            sale_uuid: SaleUuid::from_uuid(row.try_get("sale_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            quantity: try_get_quantity(row, "quantity")?,
            price: try_get_amount(row, "price")?,
            cost: try_get_amount(row, "cost")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
