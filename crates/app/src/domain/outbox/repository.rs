//! Outbox Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    accounts::{email::EmailAddress, records::AccountUuid},
    outbox::{
        data::NewOutboxMessage,
        records::{OutboxMessageRecord, OutboxMessageUuid},
    },
};

const ENQUEUE_MESSAGE_SQL: &str = include_str!("sql/enqueue_message.sql");
const LIST_UNSENT_MESSAGES_SQL: &str = include_str!("sql/list_unsent_messages.sql");
const MARK_MESSAGE_SENT_SQL: &str = include_str!("sql/mark_message_sent.sql");

#[derive(Debug, Clone)]
pub(crate) struct PgOutboxRepository {
    pool: PgPool,
}

impl PgOutboxRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn enqueue_message(
        &self,
        message: NewOutboxMessage,
    ) -> Result<OutboxMessageRecord, sqlx::Error> {
        query_as::<Postgres, OutboxMessageRecord>(ENQUEUE_MESSAGE_SQL)
            .bind(message.uuid.into_uuid())
            .bind(message.account_uuid.map(AccountUuid::into_uuid))
            .bind(message.recipient.as_str())
            .bind(message.subject)
            .bind(message.body)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn list_unsent_messages(
        &self,
        limit: u32,
    ) -> Result<Vec<OutboxMessageRecord>, sqlx::Error> {
        query_as::<Postgres, OutboxMessageRecord>(LIST_UNSENT_MESSAGES_SQL)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
    }

    pub(crate) async fn mark_message_sent(
        &self,
        message: OutboxMessageUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_MESSAGE_SENT_SQL)
            .bind(message.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for OutboxMessageRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let recipient: String = row.try_get("recipient")?;

        Ok(Self {
            uuid: OutboxMessageUuid::from_uuid(row.try_get("uuid")?),
            account_uuid: row
                .try_get::<Option<Uuid>, _>("account_uuid")?
                .map(AccountUuid::from_uuid),
            recipient: EmailAddress::parse(&recipient).map_err(|e| sqlx::Error::ColumnDecode {
                index: "recipient".to_string(),
                source: Box::new(e),
            })?,
            subject: row.try_get("subject")?,
            body: row.try_get("body")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            sent_at: row
                .try_get::<Option<SqlxTimestamp>, _>("sent_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
