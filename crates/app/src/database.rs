//! Database connection management

use sqlx::{PgPool, Postgres, Transaction, query, query_scalar};

use crate::domain::accounts::records::AccountUuid;

/// SQL used to set account context for row-level security.
pub const SET_ACCOUNT_CONTEXT_SQL: &str =
    "SELECT set_config('app.current_account_uuid', $1, true)";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool, for queries that are not account scoped.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction and set account context for RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting account context fails.
    pub async fn begin_account_transaction(
        &self,
        account: AccountUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_ACCOUNT_CONTEXT_SQL)
            .bind(account.into_uuid().to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Whether the connected role is subject to row-level security.
///
/// Superusers and `BYPASSRLS` roles ignore every policy, so account isolation would silently
/// disappear if the service connected as one.
///
/// # Errors
///
/// Returns an error if the role attributes cannot be read.
pub async fn role_enforces_rls(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let bypasses: bool = query_scalar(
        "SELECT rolsuper OR rolbypassrls FROM pg_roles WHERE rolname = current_user",
    )
    .fetch_one(pool)
    .await?;

    Ok(!bypasses)
}

/// Shared conversions between unsigned domain amounts and signed `PostgreSQL` columns.
pub(crate) mod columns {
    use sqlx::{Row, postgres::PgRow};

    /// Read a non-negative `BIGINT` money column.
    pub(crate) fn try_get_amount(row: &PgRow, column: &str) -> sqlx::Result<u64> {
        let value: i64 = row.try_get(column)?;

        u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
    }

    /// Read a non-negative `INTEGER` quantity column.
    pub(crate) fn try_get_quantity(row: &PgRow, column: &str) -> sqlx::Result<u32> {
        let value: i32 = row.try_get(column)?;

        u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
    }

    /// Convert a money amount for binding to a `BIGINT` parameter.
    pub(crate) fn amount_param(value: u64, column: &str) -> sqlx::Result<i64> {
        i64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
    }

    /// Convert a quantity for binding to an `INTEGER` parameter.
    pub(crate) fn quantity_param(value: u32, column: &str) -> sqlx::Result<i32> {
        i32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
    }
}
