use clap::Args;
use tindahan_app::{
    database,
    domain::outbox::{OutboxService, PgOutboxService, records::OutboxMessageUuid},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct MarkSentArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Message UUID that was delivered
    #[arg(long)]
    message_uuid: Uuid,
}

pub(crate) async fn run(args: MarkSentArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    PgOutboxService::new(pool)
        .mark_sent(OutboxMessageUuid::from_uuid(args.message_uuid))
        .await
        .map_err(|error| format!("failed to mark message {}: {error}", args.message_uuid))?;

    println!("marked message {} as sent", args.message_uuid);

    Ok(())
}
