use clap::Args;
use tindahan_app::{
    auth::{AuthService, PgAuthService},
    database,
    domain::accounts::{
        AccountsService, PgAccountsService, data::NewAccount, email::EmailAddress,
        records::AccountUuid,
    },
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateAccountArgs {
    /// Shop or owner name
    #[arg(long)]
    name: String,

    /// Sign-in and recovery e-mail address
    #[arg(long)]
    email: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional account UUID; generated when omitted
    #[arg(long)]
    account_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateAccountArgs) -> Result<(), String> {
    let email = EmailAddress::parse(&args.email)
        .map_err(|error| format!("invalid email: {error}"))?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let account = PgAccountsService::new(pool.clone())
        .create_account(NewAccount {
            uuid: args
                .account_uuid
                .map_or_else(AccountUuid::new, AccountUuid::from_uuid),
            name: args.name,
            email,
        })
        .await
        .map_err(|error| format!("failed to create account: {error}"))?;

    let issued = PgAuthService::new(pool)
        .issue_api_token(account.uuid, None)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("account_uuid: {}", account.uuid);
    println!("account_name: {}", account.name);
    println!("account_email: {}", account.email.as_str());
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
