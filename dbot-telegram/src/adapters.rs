//! Adapters from Telegram (teloxide) types to dbot_core types.
//! Depends only on teloxide and dbot_core type definitions.

use dbot_core::{Chat, ChatType, Message, MessageKind, ToCoreMessage, ToCoreUser, User};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

fn unknown_user() -> User {
    User {
        id: 0,
        username: None,
        first_name: None,
        last_name: None,
    }
}

fn to_core_chat(chat: &teloxide::types::Chat) -> Chat {
    let chat_type = if chat.is_private() {
        ChatType::Private
    } else if chat.is_channel() {
        ChatType::Channel
    } else if chat.is_supergroup() {
        ChatType::Supergroup
    } else {
        ChatType::Group
    };
    Chat {
        id: chat.id.0,
        chat_type,
        title: chat.title().map(str::to_string),
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
///
/// Keeps the platform timestamp; non-text messages get empty content.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        Message {
            id: self.0.id.0 as i64,
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(unknown_user),
            chat: to_core_chat(&self.0.chat),
            content: self.0.text().unwrap_or("").to_string(),
            kind: MessageKind::Text,
            created_at: self.0.date,
        }
    }
}

/// Wraps a teloxide CallbackQuery (inline button press) for conversion to core [`Message`].
///
/// The content is the button's callback data, the chat is the one holding the keyboard, and the
/// timestamp is the receive time (callback queries carry none).
/// Returns `None` when the query carries no message (inline-mode buttons), since there is no chat to answer in.
pub struct TelegramCallbackWrapper<'a>(pub &'a teloxide::types::CallbackQuery);

impl<'a> TelegramCallbackWrapper<'a> {
    pub fn to_core(&self) -> Option<Message> {
        let message = self.0.message.as_ref()?;
        Some(Message {
            id: message.id().0 as i64,
            user: TelegramUserWrapper(&self.0.from).to_core(),
            chat: to_core_chat(message.chat()),
            content: self.0.data.clone().unwrap_or_default(),
            kind: MessageKind::Callback,
            created_at: chrono::Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a teloxide Message from Bot API JSON.
    fn make_message(chat: serde_json::Value, text: &str) -> teloxide::types::Message {
        let json = serde_json::json!({
            "message_id": 42,
            "date": 1700000000i64,
            "chat": chat,
            "from": {
                "id": 123,
                "is_bot": false,
                "first_name": "Test",
                "username": "testuser",
            },
            "text": text,
        });
        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn supergroup() -> serde_json::Value {
        serde_json::json!({ "id": -100123i64, "type": "supergroup", "title": "Test Group" })
    }

    /// **Test: TelegramUserWrapper converts teloxide User to core User with correct id, username, first_name, last_name.**
    #[test]
    fn test_telegram_user_wrapper_to_core() {
        let user: teloxide::types::User = serde_json::from_value(serde_json::json!({
            "id": 123,
            "is_bot": false,
            "first_name": "Test",
            "last_name": "User",
            "username": "testuser",
            "language_code": "en",
        }))
        .unwrap();

        let core_user = TelegramUserWrapper(&user).to_core();

        assert_eq!(core_user.id, 123);
        assert_eq!(core_user.username, Some("testuser".to_string()));
        assert_eq!(core_user.first_name, Some("Test".to_string()));
        assert_eq!(core_user.last_name, Some("User".to_string()));
    }

    /// **Test: Group message keeps id, chat title, chat type and the platform date.**
    #[test]
    fn test_group_message_to_core() {
        let msg = make_message(supergroup(), "hello");

        let core = TelegramMessageWrapper(&msg).to_core();

        assert_eq!(core.id, 42);
        assert_eq!(core.user.id, 123);
        assert_eq!(core.chat.id, -100123);
        assert_eq!(core.chat.chat_type, ChatType::Supergroup);
        assert_eq!(core.chat.title.as_deref(), Some("Test Group"));
        assert_eq!(core.content, "hello");
        assert_eq!(core.kind, MessageKind::Text);
        assert_eq!(core.created_at.timestamp(), 1700000000);
    }

    #[test]
    fn test_chat_kinds() {
        let private = make_message(
            serde_json::json!({ "id": 123, "type": "private", "first_name": "Test" }),
            "hi",
        );
        let group = make_message(
            serde_json::json!({ "id": -5, "type": "group", "title": "Small" }),
            "hi",
        );

        let private = TelegramMessageWrapper(&private).to_core();
        assert!(private.chat.is_private());
        assert!(private.chat.title.is_none());
        assert_eq!(
            TelegramMessageWrapper(&group).to_core().chat.chat_type,
            ChatType::Group
        );
    }

    /// **Test: Button press becomes a Callback message carrying the data, in the keyboard's chat.**
    #[test]
    fn test_callback_query_to_core() {
        let query: teloxide::types::CallbackQuery = serde_json::from_value(serde_json::json!({
            "id": "4382bfdwdsb323b2d9",
            "from": { "id": 123, "is_bot": false, "first_name": "Test" },
            "chat_instance": "-1",
            "data": "week",
            "message": {
                "message_id": 7,
                "date": 1700000000i64,
                "chat": supergroup(),
                "from": { "id": 999, "is_bot": true, "first_name": "Archive" },
                "text": "Which period do you want to export messages for?",
            },
        }))
        .unwrap();

        let core = TelegramCallbackWrapper(&query).to_core().unwrap();

        assert_eq!(core.kind, MessageKind::Callback);
        assert_eq!(core.content, "week");
        assert_eq!(core.user.id, 123);
        assert_eq!(core.chat.id, -100123);
        assert_eq!(core.command(Some("archive_bot")), None);
    }
}
