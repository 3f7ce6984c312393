//! Dispatcher runner: converts teloxide messages and callback queries to core::Message and passes them to HandlerChain.

use std::sync::Arc;

use anyhow::Result;
use dbot_core::{Message as CoreMessage, ToCoreMessage};
use handler_chain::HandlerChain;
use teloxide::prelude::*;
use tracing::{debug, error, info, instrument, warn};

use super::adapters::{TelegramCallbackWrapper, TelegramMessageWrapper};

/// Runs the chain for one update in its own task so polling is never blocked.
fn spawn_chain(chain: HandlerChain, core_msg: CoreMessage) {
    tokio::spawn(async move {
        debug!(
            user_id = core_msg.user.id,
            chat_id = core_msg.chat.id,
            message_id = core_msg.id,
            "step: processing update (handler chain started)"
        );
        if let Err(e) = chain.handle(&core_msg).await {
            error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
        }
    });
}

/// Starts long polling with the given teloxide Bot and HandlerChain until shutdown (Ctrl+C).
///
/// The username from `get_me` is written into `bot_username` before polling starts, so handlers can
/// recognize commands addressed to this bot.
///
/// Text messages and inline button presses are converted to core messages and handed to the chain;
/// every callback query is acknowledged. Other updates are ignored.
#[instrument(skip(bot, handler_chain, bot_username))]
pub async fn run_dispatcher(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => match &me.user.username {
            Some(username) => {
                *bot_username.write().await = Some(username.clone());
                info!(username = %username, "Connected to Telegram");
            }
            None => warn!("Bot account has no username; only bare commands are recognized"),
        },
        Err(e) => warn!(error = %e, "get_me failed; polling anyway"),
    }

    let message_chain = handler_chain.clone();
    let callback_chain = handler_chain;

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(move |msg: Message| {
            let chain = message_chain.clone();
            async move {
                if msg.text().is_none() {
                    debug!(chat_id = msg.chat.id.0, "Ignoring non-text message");
                    return respond(());
                }
                spawn_chain(chain, TelegramMessageWrapper(&msg).to_core());
                respond(())
            }
        }))
        .branch(Update::filter_callback_query().endpoint(
            move |bot: Bot, query: CallbackQuery| {
                let chain = callback_chain.clone();
                async move {
                    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                        warn!(error = %e, "Failed to answer callback query");
                    }
                    match TelegramCallbackWrapper(&query).to_core() {
                        Some(core_msg) => spawn_chain(chain, core_msg),
                        None => debug!(user_id = query.from.id.0, "Ignoring callback without message"),
                    }
                    respond(())
                }
            },
        ));

    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped");
    Ok(())
}
