//! # archive-bot
//!
//! Application crate: env config, component assembly, CLI, and the runner that wires
//! storage, the export dialogue and the handlers into a Telegram dispatcher.

pub mod cli;
pub mod components;
pub mod config;
pub mod runner;

pub use cli::{Cli, Commands};
pub use components::{build_bot_components, build_handler_chain, build_teloxide_bot, BotComponents};
pub use config::BotConfig;
pub use runner::run_bot;
