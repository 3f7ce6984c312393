//! Handler that archives group messages and moves the chat's last-message pointer.

use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Message, MessageKind, Result};
use storage::{MessageArchive, NewMessage};
use tracing::{debug, error, info, instrument};

/// Archives every non-private, non-command text message that reaches it; always continues.
///
/// Storage failures are logged and never reach the chain.
#[derive(Clone)]
pub struct PersistenceHandler {
    archive: Arc<MessageArchive>,
}

impl PersistenceHandler {
    pub fn new(archive: Arc<MessageArchive>) -> Self {
        Self { archive }
    }

    /// Whether `message` belongs in the archive.
    pub fn should_archive(message: &Message) -> bool {
        message.kind == MessageKind::Text
            && !message.chat.is_private()
            && !message.content.starts_with('/')
    }
}

fn to_new_message(message: &Message) -> NewMessage {
    NewMessage {
        chat_message_id: message.id,
        user_id: message.user.id,
        username: message.user.username.clone(),
        text: message.content.clone(),
        chat_name: message.chat.title.clone().unwrap_or_default(),
        chat_id: message.chat.id,
        message_date: message.created_at,
    }
}

#[async_trait]
impl Handler for PersistenceHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, message_id = message.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !Self::should_archive(message) {
            debug!(chat_type = %message.chat.chat_type, kind = ?message.kind, "Not archived");
            return Ok(HandlerResponse::Continue);
        }

        if self.archive.record_message(&to_new_message(message)).await {
            info!(user_id = message.user.id, "Message archived");
        }

        if let Err(e) = self
            .archive
            .upsert_last_message(message.chat.id, message.id)
            .await
        {
            error!(error = %e, "Failed to update last message pointer");
        } else {
            debug!(last_message_id = message.id, "Last message pointer updated");
        }

        Ok(HandlerResponse::Continue)
    }
}
