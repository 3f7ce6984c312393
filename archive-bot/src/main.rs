//! archive-bot CLI: run the Telegram bot. Config from env (and `.env`) plus optional CLI args.

use anyhow::Result;
use archive_bot::{run_bot, BotConfig, Cli, Commands};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            run_bot(config).await
        }
    }
}
