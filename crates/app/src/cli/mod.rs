use clap::{Parser, Subcommand};

mod account;
mod db;
mod outbox;
mod token;

#[derive(Debug, Parser)]
#[command(name = "tindahan-app", about = "Tindahan CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Account(account::AccountCommand),
    Token(token::TokenCommand),
    Outbox(outbox::OutboxCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Account(command) => account::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Outbox(command) => outbox::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
