//! `/export` conversation: prompt for a period, resolve it to a date range, send `messages.csv`.
//!
//! States per requester: idle (no session) → Choosing → (AwaitingCustomRange →) terminal.
//! Every terminal outcome, success or failure, removes the session; nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dbot_core::{Bot, Chat, Handler, HandlerResponse, Message, MessageKind, Result};
use storage::MessageArchive;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use crate::csv_export::to_csv;
use crate::period::{parse_custom_range, selection_keyboard, DateRange, Selection};
use crate::session::{DialogueState, SessionKey, SessionStore};

pub const EXPORT_COMMAND: &str = "export";
pub const EXPORT_FILE_NAME: &str = "messages.csv";

pub const CHOOSE_PERIOD_PROMPT: &str = "Which period do you want to export messages for?";
pub const CUSTOM_RANGE_PROMPT: &str = "Enter a date range in the format YYYY-MM-DD YYYY-MM-DD:";
pub const INVALID_RANGE_REPLY: &str =
    "Could not process the date range. Make sure you use the format YYYY-MM-DD YYYY-MM-DD.";
pub const UNKNOWN_OPTION_REPLY: &str = "Unknown export option. Send /export to start again.";
pub const EXPORT_FAILED_REPLY: &str = "Could not generate the export.";

/// Chain handler driving the export conversation. Consumes (Stop) the command, every button press,
/// and the free-text range it is waiting for; everything else continues down the chain.
pub struct ExportDialogue {
    archive: Arc<MessageArchive>,
    bot: Arc<dyn Bot>,
    sessions: SessionStore,
    bot_username: Arc<RwLock<Option<String>>>,
}

impl ExportDialogue {
    pub fn new(archive: Arc<MessageArchive>, bot: Arc<dyn Bot>, session_ttl: Duration) -> Self {
        Self {
            archive,
            bot,
            sessions: SessionStore::new(session_ttl),
            bot_username: Arc::new(RwLock::new(None)),
        }
    }

    /// Shares the bot username cache filled from `get_me`; `/export@<username>` is accepted only
    /// for this bot's own username.
    pub fn with_bot_username(mut self, bot_username: Arc<RwLock<Option<String>>>) -> Self {
        self.bot_username = bot_username;
        self
    }

    async fn is_export_command(&self, message: &Message) -> bool {
        let username = self.bot_username.read().await;
        message.command(username.as_deref()) == Some(EXPORT_COMMAND)
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Idle → Choosing: send the five options.
    #[instrument(skip(self, message), fields(chat_id = key.chat_id, user_id = key.user_id))]
    async fn start(&self, message: &Message, key: SessionKey) {
        if self.sessions.begin(key).await {
            info!("Restarting export session");
        }
        if let Err(e) = self
            .bot
            .send_choices(&message.chat, CHOOSE_PERIOD_PROMPT, &selection_keyboard())
            .await
        {
            error!(error = %e, "Failed to send export prompt");
            self.sessions.take_in(key, DialogueState::Choosing).await;
        }
    }

    /// Choosing → terminal (preset or unknown value) or AwaitingCustomRange.
    #[instrument(skip(self, message), fields(chat_id = key.chat_id, user_id = key.user_id, data = %message.content))]
    async fn on_selection(&self, message: &Message, key: SessionKey) {
        if !self.sessions.take_in(key, DialogueState::Choosing).await {
            warn!("No export session waiting for a selection; ignoring");
            return;
        }

        match Selection::parse(&message.content) {
            Some(Selection::Preset(period)) => {
                info!(period = ?period, "Export period selected");
                self.export(&message.chat, period.resolve(Utc::now())).await;
            }
            Some(Selection::CustomRange) => {
                self.sessions.set(key, DialogueState::AwaitingCustomRange).await;
                self.send(&message.chat, CUSTOM_RANGE_PROMPT).await;
            }
            None => {
                warn!("Unrecognized export selection; ending session");
                self.send(&message.chat, UNKNOWN_OPTION_REPLY).await;
            }
        }
    }

    /// AwaitingCustomRange → terminal.
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, user_id = message.user.id))]
    async fn on_custom_range(&self, message: &Message) {
        match parse_custom_range(&message.content) {
            Ok(range) => {
                self.export(&message.chat, range).await;
            }
            Err(e) => {
                warn!(error = %e, input = %message.content, "Invalid custom date range");
                self.send(&message.chat, INVALID_RANGE_REPLY).await;
            }
        }
    }

    /// Fetches `range`, renders CSV and delivers it to `chat`. Returns the number of exported messages.
    #[instrument(skip(self, chat), fields(chat_id = chat.id))]
    pub async fn export(&self, chat: &Chat, range: DateRange) -> Option<usize> {
        let messages = self.archive.fetch_messages(range.start, range.end).await;
        let csv = match to_csv(&messages) {
            Ok(csv) => csv,
            Err(e) => {
                error!(error = %e, "Failed to render CSV");
                self.send(chat, EXPORT_FAILED_REPLY).await;
                return None;
            }
        };

        match self.bot.send_document(chat, EXPORT_FILE_NAME, csv).await {
            Ok(()) => {
                info!(count = messages.len(), "Export delivered");
                Some(messages.len())
            }
            Err(e) => {
                error!(error = %e, "Failed to deliver export");
                None
            }
        }
    }

    async fn send(&self, chat: &Chat, text: &str) {
        if let Err(e) = self.bot.send_message(chat, text).await {
            error!(error = %e, chat_id = chat.id, "Failed to send message");
        }
    }
}

#[async_trait]
impl Handler for ExportDialogue {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let key = SessionKey::of(message);
        match message.kind {
            MessageKind::Callback => {
                self.on_selection(message, key).await;
                Ok(HandlerResponse::Stop)
            }
            MessageKind::Text if self.is_export_command(message).await => {
                self.start(message, key).await;
                Ok(HandlerResponse::Stop)
            }
            MessageKind::Text => {
                if self
                    .sessions
                    .take_in(key, DialogueState::AwaitingCustomRange)
                    .await
                {
                    self.on_custom_range(message).await;
                    Ok(HandlerResponse::Stop)
                } else {
                    Ok(HandlerResponse::Continue)
                }
            }
        }
    }
}
