use serde::{Deserialize, Serialize};

/// The `lastmessages` row for one chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LastMessagePointer {
    pub chat_id: i64,
    pub last_message_id: i64,
}
