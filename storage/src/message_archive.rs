//! Message archive: record messages, track the last message per chat, fetch by date range.
//!
//! Every statement goes through [`StorageGateway`]; SQLite via sqlx.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::{error, info, instrument};

use crate::error::StorageError;
use crate::gateway::{DatabaseConfig, SqlParam, StorageGateway};
use crate::models::{LastMessagePointer, MessageRecord, NewMessage};

const CREATE_MESSAGES: &str = r#"
    CREATE TABLE IF NOT EXISTS messages (
        message_id INTEGER PRIMARY KEY AUTOINCREMENT,
        chat_message_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        username TEXT,
        text TEXT NOT NULL,
        chat_name TEXT NOT NULL,
        chat_id INTEGER NOT NULL,
        message_date TEXT NOT NULL
    )
"#;

const CREATE_LASTMESSAGES: &str = r#"
    CREATE TABLE IF NOT EXISTS lastmessages (
        chat_id INTEGER PRIMARY KEY,
        last_message_id INTEGER NOT NULL
    )
"#;

const CREATE_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_messages_message_date ON messages(message_date)",
    "CREATE INDEX IF NOT EXISTS idx_messages_chat_id ON messages(chat_id)",
];

const INSERT_MESSAGE: &str = r#"
    INSERT INTO messages (chat_message_id, user_id, username, text, chat_name, chat_id, message_date)
    VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

const UPSERT_LAST_MESSAGE: &str = r#"
    INSERT INTO lastmessages (chat_id, last_message_id) VALUES (?, ?)
    ON CONFLICT(chat_id) DO UPDATE SET last_message_id = excluded.last_message_id
"#;

const SELECT_RANGE: &str = r#"
    SELECT message_id, chat_message_id, user_id, username, text, chat_name, chat_id, message_date
    FROM messages
    WHERE message_date BETWEEN ? AND ?
    ORDER BY message_date, message_id
"#;

#[derive(Clone)]
pub struct MessageArchive {
    gateway: StorageGateway,
}

impl MessageArchive {
    pub fn new(gateway: StorageGateway) -> Self {
        Self { gateway }
    }

    /// Builds the gateway from `config` and creates the tables if they do not exist.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let archive = Self::new(StorageGateway::new(config)?);
        archive.init().await?;
        Ok(archive)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        self.gateway.execute(CREATE_MESSAGES, &[], false).await?;
        self.gateway.execute(CREATE_LASTMESSAGES, &[], false).await?;
        for statement in CREATE_INDEXES {
            self.gateway.execute(statement, &[], false).await?;
        }

        info!("Database tables created successfully");
        Ok(())
    }

    /// Inserts one message. Best-effort: failures are logged and swallowed; returns whether the row
    /// was written.
    #[instrument(skip(self, message), fields(chat_id = message.chat_id, chat_message_id = message.chat_message_id))]
    pub async fn record_message(&self, message: &NewMessage) -> bool {
        let params = [
            SqlParam::Int(message.chat_message_id),
            SqlParam::Int(message.user_id),
            SqlParam::Text(message.username.clone()),
            SqlParam::Text(Some(message.text.clone())),
            SqlParam::Text(Some(message.chat_name.clone())),
            SqlParam::Int(message.chat_id),
            SqlParam::Timestamp(message.message_date),
        ];
        match self.gateway.execute(INSERT_MESSAGE, &params, false).await {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "Error saving message");
                false
            }
        }
    }

    /// Points `chat_id` at `last_message_id`, inserting or updating in one atomic statement.
    #[instrument(skip(self))]
    pub async fn upsert_last_message(
        &self,
        chat_id: i64,
        last_message_id: i64,
    ) -> Result<(), StorageError> {
        self.gateway
            .execute(
                UPSERT_LAST_MESSAGE,
                &[SqlParam::Int(chat_id), SqlParam::Int(last_message_id)],
                false,
            )
            .await?;
        Ok(())
    }

    /// Messages with `start <= message_date <= end`, oldest first. Any failure yields an empty list.
    #[instrument(skip(self))]
    pub async fn fetch_messages(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<MessageRecord> {
        let rows = match self
            .gateway
            .execute(
                SELECT_RANGE,
                &[SqlParam::Timestamp(start), SqlParam::Timestamp(end)],
                true,
            )
            .await
        {
            Ok(outcome) => outcome.into_rows(),
            Err(e) => {
                error!(error = %e, "Error fetching messages");
                return Vec::new();
            }
        };

        let messages: Result<Vec<MessageRecord>, _> = rows.iter().map(MessageRecord::from_row).collect();
        match messages {
            Ok(messages) => {
                info!(count = messages.len(), "Retrieved messages");
                messages
            }
            Err(e) => {
                error!(error = %e, "Error decoding messages");
                Vec::new()
            }
        }
    }

    pub async fn last_message(&self, chat_id: i64) -> Result<Option<LastMessagePointer>, StorageError> {
        let rows = self
            .gateway
            .execute(
                "SELECT chat_id, last_message_id FROM lastmessages WHERE chat_id = ?",
                &[SqlParam::Int(chat_id)],
                true,
            )
            .await?
            .into_rows();
        rows.first()
            .map(LastMessagePointer::from_row)
            .transpose()
            .map_err(|e| StorageError::Query(e.to_string()))
    }

    /// Number of pointer rows for `chat_id` (0 or 1).
    pub async fn pointer_count(&self, chat_id: i64) -> Result<u64, StorageError> {
        let outcome = self
            .gateway
            .execute(
                "SELECT chat_id FROM lastmessages WHERE chat_id = ?",
                &[SqlParam::Int(chat_id)],
                true,
            )
            .await?;
        Ok(outcome.affected())
    }
}
