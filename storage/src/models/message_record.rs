//! Message record model for persistence.
//!
//! Maps to the `messages` table and is used by MessageArchive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored message, as read back from the `messages` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    /// Archive-assigned row id.
    pub message_id: i64,
    /// Platform message id within the chat.
    pub chat_message_id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub text: String,
    pub chat_name: String,
    pub chat_id: i64,
    pub message_date: DateTime<Utc>,
}

/// A message to record; `message_id` is assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub chat_message_id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub text: String,
    pub chat_name: String,
    pub chat_id: i64,
    pub message_date: DateTime<Utc>,
}
