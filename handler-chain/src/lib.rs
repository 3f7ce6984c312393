//! # Handler chain
//!
//! Runs every update through an ordered list of handlers: all `before` in order (any false stops
//! the chain), then `handle` until one returns Stop, then all `after` in reverse order.

use dbot_core::{Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Ordered handlers applied to each inbound update.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs before → handle until Stop → after (reverse). Returns Stop if any handler consumed the update.
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, message_id = message.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        for h in &self.handlers {
            if !h.before(message).await? {
                info!(
                    handler = %std::any::type_name_of_val(h.as_ref()),
                    "before returned false, chain stopped"
                );
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut final_response = HandlerResponse::Continue;
        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            let response = h.handle(message).await?;
            debug!(handler = %name, response = ?response, "handler done");
            if response == HandlerResponse::Stop {
                debug!(handler = %name, "update consumed");
                final_response = response;
                break;
            }
        }

        for h in self.handlers.iter().rev() {
            h.after(message, &final_response).await?;
        }

        Ok(final_response)
    }
}

// Tests live in tests/handler_chain_test.rs
