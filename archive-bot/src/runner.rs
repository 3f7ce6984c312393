//! Bot runner: logging, storage, handler chain, then Telegram polling.

use anyhow::Result;
use dbot_core::init_tracing;
use dbot_telegram::run_dispatcher;
use tracing::{info, instrument};

use super::components::{build_bot_components, build_handler_chain};
use super::config::BotConfig;

/// Main entry: validate config, init logging, open storage, build the chain, then poll until shutdown.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(
        database_url = %config.database_url,
        log_file = %config.log_file,
        "Initializing bot"
    );

    let components = build_bot_components(&config).await?;
    let handler_chain = build_handler_chain(
        components.archive.clone(),
        components.bot_adapter.clone(),
        components.bot_username.clone(),
        config.export_session_ttl,
    );

    info!("Bot started successfully");

    run_dispatcher(
        components.teloxide_bot,
        handler_chain,
        components.bot_username,
    )
    .await
}
