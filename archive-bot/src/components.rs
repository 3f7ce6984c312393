//! Component factory: builds storage, the Telegram client and the handler chain from config.

use anyhow::{Context, Result};
use dbot_core::Bot as CoreBot;
use dbot_telegram::TelegramBotAdapter;
use export::ExportDialogue;
use handler_chain::HandlerChain;
use handlers::{LoggingHandler, PersistenceHandler};
use std::sync::Arc;
use std::time::Duration;
use storage::MessageArchive;
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use super::config::BotConfig;

/// Core dependencies for run_bot; produced by the component factory.
pub struct BotComponents {
    pub archive: Arc<MessageArchive>,
    pub teloxide_bot: Bot,
    pub bot_adapter: Arc<dyn CoreBot>,
    /// Filled by the dispatcher from `get_me`; read by handlers that match `/command@username`.
    pub bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
}

/// teloxide Bot for the configured token, pointed at the custom API URL when one is set.
pub fn build_teloxide_bot(config: &BotConfig) -> Bot {
    let bot = Bot::new(config.bot_token.clone());
    if let Some(ref url_str) = config.telegram_api_url {
        match reqwest::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        }
    } else {
        bot
    }
}

/// Opens the archive (creating the schema) and builds the Telegram client and its [`CoreBot`] adapter.
#[instrument(skip(config))]
pub async fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let archive = Arc::new(
        MessageArchive::open(&config.database_config())
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    database_url = %config.database_url,
                    "Failed to initialize message storage"
                );
                e
            })
            .context("Failed to initialize message storage")?,
    );
    info!(database_url = %config.database_url, "Message storage ready");

    let teloxide_bot = build_teloxide_bot(config);
    let bot_adapter: Arc<dyn CoreBot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));

    Ok(BotComponents {
        archive,
        teloxide_bot,
        bot_adapter,
        bot_username: Arc::new(tokio::sync::RwLock::new(None)),
    })
}

/// Builds the handler chain (logging → export dialogue → persistence).
///
/// The dialogue stops the chain for updates it consumes, so commands, button presses and
/// custom ranges never reach the archive.
pub fn build_handler_chain(
    archive: Arc<MessageArchive>,
    bot: Arc<dyn CoreBot>,
    bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
    export_session_ttl: Duration,
) -> HandlerChain {
    let export_dialogue = ExportDialogue::new(archive.clone(), bot, export_session_ttl)
        .with_bot_username(bot_username);
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(export_dialogue))
        .add_handler(Arc::new(PersistenceHandler::new(archive)))
}
