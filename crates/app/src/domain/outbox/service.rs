//! Outbox service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;

use crate::domain::outbox::{
    data::NewOutboxMessage,
    errors::OutboxServiceError,
    records::{OutboxMessageRecord, OutboxMessageUuid},
    repository::PgOutboxRepository,
};

#[derive(Debug, Clone)]
pub struct PgOutboxService {
    repository: PgOutboxRepository,
}

impl PgOutboxService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgOutboxRepository::new(pool),
        }
    }
}

#[async_trait]
impl OutboxService for PgOutboxService {
    async fn enqueue(
        &self,
        message: NewOutboxMessage,
    ) -> Result<OutboxMessageRecord, OutboxServiceError> {
        let record = self.repository.enqueue_message(message).await?;

        info!(
            message_uuid = %record.uuid,
            recipient = %record.recipient.masked(),
            "queued e-mail"
        );

        Ok(record)
    }

    async fn list_unsent(&self, limit: u32) -> Result<Vec<OutboxMessageRecord>, OutboxServiceError> {
        self.repository
            .list_unsent_messages(limit)
            .await
            .map_err(Into::into)
    }

    async fn mark_sent(&self, message: OutboxMessageUuid) -> Result<(), OutboxServiceError> {
        let rows_affected = self.repository.mark_message_sent(message).await?;

        if rows_affected == 0 {
            return Err(OutboxServiceError::NotFound);
        }

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OutboxService: Send + Sync {
    /// Queue a message for delivery.
    async fn enqueue(
        &self,
        message: NewOutboxMessage,
    ) -> Result<OutboxMessageRecord, OutboxServiceError>;

    /// Oldest unsent messages first.
    async fn list_unsent(&self, limit: u32) -> Result<Vec<OutboxMessageRecord>, OutboxServiceError>;

    /// Record delivery and clear the stored body. Fails with `NotFound` when the message is
    /// unknown or already sent.
    async fn mark_sent(&self, message: OutboxMessageUuid) -> Result<(), OutboxServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::accounts::email::EmailAddress, test::TestContext};

    use super::*;

    fn message(recipient: &str) -> Result<NewOutboxMessage, Box<dyn std::error::Error>> {
        Ok(NewOutboxMessage {
            uuid: OutboxMessageUuid::new(),
            account_uuid: None,
            recipient: EmailAddress::parse(recipient)?,
            subject: "Your Tindahan access token".to_string(),
            body: "Hello".to_string(),
        })
    }

    #[tokio::test]
    async fn enqueue_stores_unsent_message() -> TestResult {
        let ctx = TestContext::new().await;

        let mut new = message("owner@store.ph")?;
        new.account_uuid = Some(ctx.account_uuid);

        let record = ctx.outbox.enqueue(new.clone()).await?;

        assert_eq!(record.uuid, new.uuid);
        assert_eq!(record.account_uuid, Some(ctx.account_uuid));
        assert_eq!(record.recipient.as_str(), "owner@store.ph");
        assert!(record.sent_at.is_none());

        let unsent = ctx.outbox.list_unsent(10).await?;

        assert_eq!(unsent, vec![record]);

        Ok(())
    }

    #[tokio::test]
    async fn mark_sent_removes_from_unsent() -> TestResult {
        let ctx = TestContext::new().await;

        let first = ctx.outbox.enqueue(message("a@store.ph")?).await?;
        let second = ctx.outbox.enqueue(message("b@store.ph")?).await?;

        ctx.outbox.mark_sent(first.uuid).await?;

        let unsent = ctx.outbox.list_unsent(10).await?;
        let again = ctx.outbox.mark_sent(first.uuid).await;

        assert_eq!(
            unsent.iter().map(|m| m.uuid).collect::<Vec<_>>(),
            vec![second.uuid]
        );
        assert!(
            matches!(again, Err(OutboxServiceError::NotFound)),
            "expected NotFound, got {again:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn mark_sent_clears_the_body() -> TestResult {
        let ctx = TestContext::new().await;

        let mut new = message("owner@store.ph")?;
        new.body = "Your new API token is tdn_v1_secret".to_string();

        let record = ctx.outbox.enqueue(new).await?;

        ctx.outbox.mark_sent(record.uuid).await?;

        let (body, sent): (String, bool) =
            sqlx::query_as("SELECT body, sent_at IS NOT NULL FROM email_outbox WHERE uuid = $1")
                .bind(record.uuid.into_uuid())
                .fetch_one(ctx.db.pool())
                .await?;

        assert_eq!(body, "");
        assert!(sent);

        Ok(())
    }

    #[tokio::test]
    async fn enqueue_unknown_account_returns_invalid_reference() -> TestResult {
        let ctx = TestContext::new().await;

        let mut new = message("ghost@store.ph")?;
        new.account_uuid = Some(crate::domain::accounts::records::AccountUuid::new());

        let result = ctx.outbox.enqueue(new).await;

        assert!(
            matches!(result, Err(OutboxServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }
}
