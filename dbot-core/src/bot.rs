//! Bot abstraction for outbound delivery: text, choice prompts and documents.
//!
//! [`Bot`] trait is transport-agnostic; dbot-telegram implements it via teloxide and tests
//! substitute a recording mock.

use crate::error::Result;
use crate::types::Chat;
use async_trait::async_trait;

/// One selectable action in a choice prompt: the visible label and the value sent back when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub data: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Abstraction for sending to a chat. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a prompt with selectable actions laid out in rows.
    async fn send_choices(&self, chat: &Chat, text: &str, rows: &[Vec<Choice>]) -> Result<()>;
    /// Sends `content` as a named file.
    async fn send_document(&self, chat: &Chat, file_name: &str, content: Vec<u8>) -> Result<()>;
}
