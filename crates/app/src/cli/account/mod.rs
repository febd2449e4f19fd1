use clap::{Args, Subcommand};

mod create;
mod delete;

#[derive(Debug, Args)]
pub(crate) struct AccountCommand {
    #[command(subcommand)]
    command: AccountSubcommand,
}

#[derive(Debug, Subcommand)]
enum AccountSubcommand {
    Create(create::CreateAccountArgs),
    Delete(delete::DeleteAccountArgs),
}

pub(crate) async fn run(command: AccountCommand) -> Result<(), String> {
    match command.command {
        AccountSubcommand::Create(args) => create::run(args).await,
        AccountSubcommand::Delete(args) => delete::run(args).await,
    }
}
