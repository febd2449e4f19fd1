use clap::{Args, Subcommand};

mod list;
mod mark_sent;

#[derive(Debug, Args)]
pub(crate) struct OutboxCommand {
    #[command(subcommand)]
    command: OutboxSubcommand,
}

#[derive(Debug, Subcommand)]
enum OutboxSubcommand {
    /// Print queued e-mails, oldest first
    List(list::ListOutboxArgs),

    /// Record delivery and clear the stored body
    MarkSent(mark_sent::MarkSentArgs),
}

pub(crate) async fn run(command: OutboxCommand) -> Result<(), String> {
    match command.command {
        OutboxSubcommand::List(args) => list::run(args).await,
        OutboxSubcommand::MarkSent(args) => mark_sent::run(args).await,
    }
}
