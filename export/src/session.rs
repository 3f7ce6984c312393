//! In-memory export sessions keyed by requester, with expiry of abandoned conversations.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use dbot_core::Message;
use tokio::sync::Mutex;
use tracing::debug;

/// Requester identity: the chat the command was issued in and the user who issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: i64,
}

impl SessionKey {
    pub fn of(message: &Message) -> Self {
        Self {
            chat_id: message.chat.id,
            user_id: message.user.id,
        }
    }
}

/// Non-idle dialogue states. Idle and terminal are represented by the absence of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    /// Prompt with the five options sent; waiting for a button press.
    Choosing,
    /// Custom range requested; waiting for `YYYY-MM-DD YYYY-MM-DD`.
    AwaitingCustomRange,
}

struct Session {
    state: DialogueState,
    touched: Instant,
}

pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<SessionKey, Session>>,
}

impl SessionStore {
    /// Sessions idle for `ttl` or longer are dropped.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn purge_expired(&self, sessions: &mut HashMap<SessionKey, Session>) {
        let before = sessions.len();
        sessions.retain(|_, s| s.touched.elapsed() < self.ttl);
        if sessions.len() < before {
            debug!(expired = before - sessions.len(), "Dropped expired export sessions");
        }
    }

    /// Starts a session in [`DialogueState::Choosing`]. Returns true if it replaced a live one.
    pub async fn begin(&self, key: SessionKey) -> bool {
        self.set(key, DialogueState::Choosing).await
    }

    /// Moves the session to `state`, creating it if absent. Returns true if a live session existed.
    pub async fn set(&self, key: SessionKey, state: DialogueState) -> bool {
        let mut sessions = self.sessions.lock().await;
        self.purge_expired(&mut sessions);
        sessions
            .insert(
                key,
                Session {
                    state,
                    touched: Instant::now(),
                },
            )
            .is_some()
    }

    pub async fn state(&self, key: SessionKey) -> Option<DialogueState> {
        let mut sessions = self.sessions.lock().await;
        self.purge_expired(&mut sessions);
        sessions.get(&key).map(|s| s.state)
    }

    /// Removes the session only if it is live and in `expected`. Returns whether it was removed.
    pub async fn take_in(&self, key: SessionKey, expected: DialogueState) -> bool {
        let mut sessions = self.sessions.lock().await;
        self.purge_expired(&mut sessions);
        match sessions.get(&key) {
            Some(s) if s.state == expected => {
                sessions.remove(&key);
                true
            }
            _ => false,
        }
    }

    pub async fn len(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        self.purge_expired(&mut sessions);
        sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
