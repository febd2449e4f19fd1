use clap::Args;
use tindahan_app::{
    database,
    domain::outbox::{OutboxService, PgOutboxService},
};

#[derive(Debug, Args)]
pub(crate) struct ListOutboxArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Maximum number of messages to print
    #[arg(long, default_value_t = 20)]
    limit: u32,
}

pub(crate) async fn run(args: ListOutboxArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let messages = PgOutboxService::new(pool)
        .list_unsent(args.limit)
        .await
        .map_err(|error| format!("failed to list outbox: {error}"))?;

    if messages.is_empty() {
        println!("outbox is empty");
        return Ok(());
    }

    for message in messages {
        println!("message_uuid: {}", message.uuid);
        println!("recipient: {}", message.recipient);
        println!("subject: {}", message.subject);
        println!("created_at: {}", message.created_at);
        println!();
        println!("{}", message.body);
        println!();
    }

    Ok(())
}
