//! Reports Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::columns::{try_get_amount, try_get_quantity},
    domain::{
        products::records::ProductUuid,
        reports::{
            chart::SalePoint,
            export::ProductSalesRow,
            summary::{InventoryTotals, SalesTotals, TopProduct},
        },
    },
};

const SALES_TOTALS_SQL: &str = include_str!("sql/sales_totals.sql");
const TOP_PRODUCTS_SQL: &str = include_str!("sql/top_products.sql");
const SALE_POINTS_SQL: &str = include_str!("sql/sale_points.sql");
const PRODUCT_SALES_SQL: &str = include_str!("sql/product_sales.sql");
const INVENTORY_SQL: &str = include_str!("sql/inventory.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReportsRepository;

impl PgReportsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn sales_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        since: Timestamp,
    ) -> Result<SalesTotals, sqlx::Error> {
        query_as::<Postgres, SalesTotals>(SALES_TOTALS_SQL)
            .bind(SqlxTimestamp::from(since))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn top_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        since: Timestamp,
        limit: u32,
    ) -> Result<Vec<TopProduct>, sqlx::Error> {
        query_as::<Postgres, TopProduct>(TOP_PRODUCTS_SQL)
            .bind(SqlxTimestamp::from(since))
            .bind(i64::from(limit))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn sale_points(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        since: Timestamp,
    ) -> Result<Vec<SalePoint>, sqlx::Error> {
        query_as::<Postgres, SalePoint>(SALE_POINTS_SQL)
            .bind(SqlxTimestamp::from(since))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn product_sales(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        since: Timestamp,
    ) -> Result<Vec<ProductSalesRow>, sqlx::Error> {
        query_as::<Postgres, ProductSalesRow>(PRODUCT_SALES_SQL)
            .bind(SqlxTimestamp::from(since))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn inventory(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<InventoryTotals, sqlx::Error> {
        query_as::<Postgres, InventoryTotals>(INVENTORY_SQL)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for SalesTotals {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            gross: try_get_amount(row, "gross")?,
            profit: row.try_get("profit")?,
            count: try_get_amount(row, "sale_count")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for TopProduct {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product_name: row.try_get("product_name")?,
            quantity: try_get_amount(row, "quantity")?,
            revenue: try_get_amount(row, "revenue")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for SalePoint {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            total: try_get_amount(row, "total")?,
            profit: row.try_get("profit")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProductSalesRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            stock: try_get_quantity(row, "stock")?,
            sold: try_get_amount(row, "sold")?,
            revenue: try_get_amount(row, "revenue")?,
            profit: row.try_get("profit")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for InventoryTotals {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product_count: try_get_amount(row, "product_count")?,
            low_stock_count: try_get_amount(row, "low_stock_count")?,
            inventory_value: try_get_amount(row, "inventory_value")?,
        })
    }
}
