//! # dbot-core
//!
//! Core types and traits for the archive bot: [`Bot`], [`Handler`], message, chat and user types,
//! and tracing initialization. Transport-agnostic; used by dbot-telegram, handler-chain and the handlers.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{Bot, Choice};
pub use error::{DbotError, HandlerError, Result};
pub use logger::init_tracing;
pub use types::{
    Chat, ChatType, Handler, HandlerResponse, Message, MessageKind, ToCoreMessage, ToCoreUser,
    User,
};
