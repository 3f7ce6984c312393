//! Storage crate: message archive over a per-call SQLite gateway.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`gateway`] – StorageGateway, DatabaseConfig, SqlParam, QueryOutcome
//! - [`models`] – MessageRecord, NewMessage, LastMessagePointer
//! - [`message_archive`] – MessageArchive (record, last-message upsert, range fetch)

mod error;
mod gateway;
mod message_archive;
mod models;

pub use error::StorageError;
pub use gateway::{DatabaseConfig, QueryOutcome, SqlParam, StorageGateway};
pub use message_archive::MessageArchive;
pub use models::{LastMessagePointer, MessageRecord, NewMessage};
