//! Sales Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::columns::{amount_param, try_get_amount},
    domain::sales::{
        data::SalesQuery,
        records::{SaleRecord, SaleStatus, SaleUuid},
        totals::SaleTotals,
    },
};

const CREATE_SALE_SQL: &str = include_str!("../sql/create_sale.sql");
const GET_SALE_SQL: &str = include_str!("../sql/get_sale.sql");
const LIST_SALES_SQL: &str = include_str!("../sql/list_sales.sql");
const VOID_SALE_SQL: &str = include_str!("../sql/void_sale.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSalesRepository;

impl PgSalesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_sale(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale: SaleUuid,
        totals: SaleTotals,
    ) -> Result<SaleRecord, sqlx::Error> {
        query_as::<Postgres, SaleRecord>(CREATE_SALE_SQL)
            .bind(sale.into_uuid())
            .bind(amount_param(totals.total, "total")?)
            .bind(totals.profit)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_sale(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale: SaleUuid,
    ) -> Result<SaleRecord, sqlx::Error> {
        query_as::<Postgres, SaleRecord>(GET_SALE_SQL)
            .bind(sale.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_sales(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sales_query: SalesQuery,
    ) -> Result<Vec<SaleRecord>, sqlx::Error> {
        query_as::<Postgres, SaleRecord>(LIST_SALES_SQL)
            .bind(sales_query.since.map(SqlxTimestamp::from))
            .bind(i64::from(sales_query.limit))
            .fetch_all(&mut **tx)
            .await
    }

    /// Move an active sale to voided. `None` when the sale is missing or already voided.
    pub(crate) async fn void_sale(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale: SaleUuid,
    ) -> Result<Option<SaleRecord>, sqlx::Error> {
        query_as::<Postgres, SaleRecord>(VOID_SALE_SQL)
            .bind(sale.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for SaleRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        Ok(Self {
            uuid: SaleUuid::from_uuid(row.try_get("uuid")?),
            total: try_get_amount(row, "total")?,
            profit: row.try_get("profit")?,
            status: status
                .parse::<SaleStatus>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "status".to_string(),
                    source: Box::new(e),
                })?,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            voided_at: row
                .try_get::<Option<SqlxTimestamp>, _>("voided_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
