//! Wraps teloxide::Bot and implements [`dbot_core::Bot`]. Production code sends via Telegram; tests can substitute another Bot impl.

use async_trait::async_trait;
use dbot_core::{Bot as CoreBot, Chat, Choice, DbotError, Result};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile};

/// Thin wrapper around teloxide::Bot that implements dbot-core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

/// Lays out choices as an inline keyboard; each button sends its `data` back as a callback query.
pub(crate) fn inline_keyboard(rows: &[Vec<Choice>]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(rows.iter().map(|row| {
        row.iter()
            .map(|c| InlineKeyboardButton::callback(c.label.clone(), c.data.clone()))
            .collect::<Vec<_>>()
    }))
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn send_choices(&self, chat: &Chat, text: &str, rows: &[Vec<Choice>]) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .reply_markup(inline_keyboard(rows))
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn send_document(&self, chat: &Chat, file_name: &str, content: Vec<u8>) -> Result<()> {
        let document = InputFile::memory(content).file_name(file_name.to_string());
        self.bot
            .send_document(ChatId(chat.id), document)
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }
}
