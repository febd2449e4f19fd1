use clap::Args;
use tindahan_app::{
    database,
    domain::accounts::{AccountsService, PgAccountsService, records::AccountUuid},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct DeleteAccountArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Account UUID to soft-delete
    #[arg(long)]
    account_uuid: Uuid,
}

pub(crate) async fn run(args: DeleteAccountArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    PgAccountsService::new(pool)
        .delete_account(AccountUuid::from_uuid(args.account_uuid))
        .await
        .map_err(|error| format!("failed to delete account: {error}"))?;

    println!("deleted account {} and revoked its tokens", args.account_uuid);

    Ok(())
}
