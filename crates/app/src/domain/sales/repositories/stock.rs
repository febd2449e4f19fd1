//! Stock Repository
//!
//! Stock only ever moves through single conditional statements, so two sales racing for the
//! last unit cannot both succeed.

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::columns::{quantity_param, try_get_amount},
    domain::{products::records::ProductUuid, sales::records::SaleUuid},
};

const TAKE_STOCK_SQL: &str = include_str!("../sql/take_stock.sql");
const GET_AVAILABLE_STOCK_SQL: &str = include_str!("../sql/get_available_stock.sql");
const RESTORE_STOCK_SQL: &str = include_str!("../sql/restore_stock.sql");
const COUNT_SALE_PRODUCTS_SQL: &str = include_str!("../sql/count_sale_products.sql");

/// Product snapshot returned when stock was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TakenStock {
    pub(crate) uuid: ProductUuid,
    pub(crate) name: String,
    pub(crate) price: u64,
    pub(crate) cost: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgStockRepository;

impl PgStockRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Decrement stock if enough is on hand. `None` when the product is missing or short.
    pub(crate) async fn take_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Option<TakenStock>, sqlx::Error> {
        query_as::<Postgres, TakenStock>(TAKE_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(quantity_param(quantity, "quantity")?)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Current stock of a live product.
    pub(crate) async fn available_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<u32>, sqlx::Error> {
        let stock: Option<i32> = query_scalar(GET_AVAILABLE_STOCK_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(stock.map(|stock| u32::try_from(stock).unwrap_or_default()))
    }

    /// Put back the units of every item in a sale. Returns the number of products updated.
    pub(crate) async fn restore_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale: SaleUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(RESTORE_STOCK_SQL)
            .bind(sale.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Number of distinct products referenced by a sale's items.
    pub(crate) async fn count_sale_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale: SaleUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_SALE_PRODUCTS_SQL)
            .bind(sale.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(count.unsigned_abs())
    }
}

impl<'r> FromRow<'r, PgRow> for TakenStock {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            cost: try_get_amount(row, "cost")?,
        })
    }
}
