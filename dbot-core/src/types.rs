//! Core types: user, chat, message, handler response, and Handler trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identity (id, username, names).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// Human-readable name for logs: first and last name, else `@username`, else the id.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            full
        } else if let Some(username) = &self.username {
            format!("@{}", username)
        } else {
            self.id.to_string()
        }
    }
}

/// Kind of chat the message was posted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatType::Private => "private",
            ChatType::Group => "group",
            ChatType::Supergroup => "supergroup",
            ChatType::Channel => "channel",
        }
    }
}

impl std::fmt::Display for ChatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chat identity: id, kind, and title (groups and channels only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: ChatType,
    pub title: Option<String>,
}

impl Chat {
    pub fn is_private(&self) -> bool {
        self.chat_type == ChatType::Private
    }
}

/// What produced the message: typed text or a pressed inline button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    /// Inline keyboard press; `content` holds the callback data.
    Callback,
}

/// A single inbound update with user, chat, content and platform timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Platform message id (unique per chat).
    pub id: i64,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Returns the command name if the content is a bot command meant for this bot.
    ///
    /// `/export` always matches. `/export@name` matches only when `name` equals `bot_username`
    /// (case-insensitive); commands addressed to other bots, or any addressed command while the
    /// username is unknown, yield `None`.
    pub fn command(&self, bot_username: Option<&str>) -> Option<&str> {
        if self.kind != MessageKind::Text {
            return None;
        }
        let first = self.content.split_whitespace().next()?;
        let command = first.strip_prefix('/')?;
        let name = match command.split_once('@') {
            None => command,
            Some((name, target)) => match bot_username {
                Some(me) if target.eq_ignore_ascii_case(me) => name,
                _ => return None,
            },
        };
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

/// Handler result for the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; the update was consumed.
    Stop,
}

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific update type to core [`Message`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _message: &Message) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the message. Return Stop to end the handle phase. Default: Continue.
    async fn handle(&self, _message: &Message) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _message: &Message,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_message(content: &str) -> Message {
        Message {
            id: 1,
            user: User {
                id: 10,
                username: None,
                first_name: None,
                last_name: None,
            },
            chat: Chat {
                id: -100,
                chat_type: ChatType::Supergroup,
                title: Some("Team".to_string()),
            },
            content: content.to_string(),
            kind: MessageKind::Text,
            created_at: Utc::now(),
        }
    }

    const ME: Option<&str> = Some("archive_bot");

    #[test]
    fn test_command_plain_and_addressed() {
        assert_eq!(text_message("/export").command(ME), Some("export"));
        assert_eq!(text_message("/export").command(None), Some("export"));
        assert_eq!(text_message("/export@archive_bot").command(ME), Some("export"));
        assert_eq!(text_message("/export@Archive_Bot").command(ME), Some("export"));
        assert_eq!(text_message("  /export now").command(ME), Some("export"));
    }

    #[test]
    fn test_command_for_other_bot_is_ignored() {
        assert_eq!(text_message("/export@other_bot").command(ME), None);
        assert_eq!(text_message("/export@archive_bot_2").command(ME), None);
        // Username not known yet: addressed commands cannot be attributed.
        assert_eq!(text_message("/export@archive_bot").command(None), None);
    }

    #[test]
    fn test_command_absent() {
        assert_eq!(text_message("hello /export").command(ME), None);
        assert_eq!(text_message("/").command(ME), None);
        assert_eq!(text_message("/@archive_bot").command(ME), None);
        assert_eq!(text_message("").command(ME), None);

        let mut callback = text_message("/export");
        callback.kind = MessageKind::Callback;
        assert_eq!(callback.command(ME), None);
    }

    #[test]
    fn test_user_display_name() {
        let mut user = text_message("hi").user;
        assert_eq!(user.display_name(), "10");
        user.username = Some("alice".to_string());
        assert_eq!(user.display_name(), "@alice");
        user.first_name = Some("Alice".to_string());
        assert_eq!(user.display_name(), "Alice");
        user.last_name = Some("Liddell".to_string());
        assert_eq!(user.display_name(), "Alice Liddell");
    }

    #[test]
    fn test_chat_is_private() {
        let mut msg = text_message("hi");
        assert!(!msg.chat.is_private());
        msg.chat.chat_type = ChatType::Private;
        assert!(msg.chat.is_private());
        assert_eq!(ChatType::Supergroup.to_string(), "supergroup");
    }
}
