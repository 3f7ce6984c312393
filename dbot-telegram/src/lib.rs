//! # dbot-telegram
//!
//! Telegram transport layer: adapters, [`dbot_core::Bot`] implementation, dispatcher runner.
//! Handles only Telegram connectivity and handler-chain execution; archiving and export live in handlers.

mod adapters;
mod bot_adapter;
mod runner;

pub use adapters::{TelegramCallbackWrapper, TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use runner::run_dispatcher;
