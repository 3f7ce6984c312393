//! Error types for the bot core.
//!
//! [`DbotError`] is the top-level error; [`HandlerError`] describes rejected user input inside handlers.

use thiserror::Error;

/// Top-level error for dbot (bot transport, config).
#[derive(Error, Debug)]
pub enum DbotError {
    /// Outbound delivery failed (send message, keyboard or document).
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Errors produced by handlers.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Free-text date range could not be parsed.
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),
}

/// Result type for core operations; uses [`DbotError`].
pub type Result<T> = std::result::Result<T, DbotError>;
