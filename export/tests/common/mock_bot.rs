//! Mock implementation of [`dbot_core::Bot`] for integration tests.
//!
//! Records every outbound call on an unbounded channel so tests can assert on prompts,
//! replies and delivered documents without hitting Telegram.

use async_trait::async_trait;
use dbot_core::{Bot, Chat, Choice, DbotError, Result};
use std::sync::Arc;
use tokio::sync::mpsc;

/// One recorded outbound call.
#[derive(Debug, Clone)]
#[allow(dead_code)] // chat ids kept for assertions in some tests only
pub enum Sent {
    Text {
        chat_id: i64,
        text: String,
    },
    Choices {
        chat_id: i64,
        text: String,
        rows: Vec<Vec<Choice>>,
    },
    Document {
        chat_id: i64,
        file_name: String,
        content: Vec<u8>,
    },
}

/// Mock Bot that records calls. With `failing`, every send returns [`DbotError::Bot`] after recording.
pub struct MockBot {
    sent_tx: mpsc::UnboundedSender<Sent>,
    failing: bool,
}

impl MockBot {
    /// Creates a MockBot and returns the receiver for recorded calls.
    pub fn with_receiver() -> (Arc<Self>, mpsc::UnboundedReceiver<Sent>) {
        Self::build(false)
    }

    /// Like [`MockBot::with_receiver`] but every send fails.
    #[allow(dead_code)]
    pub fn failing() -> (Arc<Self>, mpsc::UnboundedReceiver<Sent>) {
        Self::build(true)
    }

    fn build(failing: bool) -> (Arc<Self>, mpsc::UnboundedReceiver<Sent>) {
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        (Arc::new(Self { sent_tx, failing }), sent_rx)
    }

    fn record(&self, sent: Sent) -> Result<()> {
        let _ = self.sent_tx.send(sent);
        if self.failing {
            Err(DbotError::Bot("mock send failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.record(Sent::Text {
            chat_id: chat.id,
            text: text.to_string(),
        })
    }

    async fn send_choices(&self, chat: &Chat, text: &str, rows: &[Vec<Choice>]) -> Result<()> {
        self.record(Sent::Choices {
            chat_id: chat.id,
            text: text.to_string(),
            rows: rows.to_vec(),
        })
    }

    async fn send_document(&self, chat: &Chat, file_name: &str, content: Vec<u8>) -> Result<()> {
        self.record(Sent::Document {
            chat_id: chat.id,
            file_name: file_name.to_string(),
            content,
        })
    }
}
