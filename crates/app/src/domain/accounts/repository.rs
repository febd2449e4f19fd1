//! Accounts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::accounts::{
    data::{AccountUpdate, NewAccount},
    email::EmailAddress,
    records::{AccountRecord, AccountUuid},
};

const CREATE_ACCOUNT_SQL: &str = include_str!("sql/create_account.sql");
const GET_ACCOUNT_SQL: &str = include_str!("sql/get_account.sql");
const FIND_ACCOUNT_BY_EMAIL_SQL: &str = include_str!("sql/find_account_by_email.sql");
const UPDATE_ACCOUNT_SQL: &str = include_str!("sql/update_account.sql");
const DELETE_ACCOUNT_SQL: &str = include_str!("sql/delete_account.sql");
const REVOKE_ACCOUNT_TOKENS_SQL: &str = include_str!("sql/revoke_account_tokens.sql");

/// PostgreSQL-backed accounts repository.
///
/// Accounts sit above row-level security, so this repository works on the pool directly.
#[derive(Debug, Clone)]
pub(crate) struct PgAccountsRepository {
    pool: PgPool,
}

impl PgAccountsRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_account(
        &self,
        account: NewAccount,
    ) -> Result<AccountRecord, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(CREATE_ACCOUNT_SQL)
            .bind(account.uuid.into_uuid())
            .bind(account.name.trim())
            .bind(account.email.as_str())
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn get_account(
        &self,
        account: AccountUuid,
    ) -> Result<AccountRecord, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(GET_ACCOUNT_SQL)
            .bind(account.into_uuid())
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn find_account_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<AccountRecord, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(FIND_ACCOUNT_BY_EMAIL_SQL)
            .bind(email.as_str())
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn update_account(
        &self,
        account: AccountUuid,
        update: &AccountUpdate,
    ) -> Result<AccountRecord, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(UPDATE_ACCOUNT_SQL)
            .bind(account.into_uuid())
            .bind(update.name.trim())
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    pub(crate) async fn delete_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ACCOUNT_SQL)
            .bind(account.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn revoke_account_tokens(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REVOKE_ACCOUNT_TOKENS_SQL)
            .bind(account.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for AccountRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let email: String = row.try_get("email")?;

        let email = EmailAddress::parse(&email).map_err(|e| sqlx::Error::ColumnDecode {
            index: "email".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: AccountUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
