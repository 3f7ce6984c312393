//! # export
//!
//! Turns archived messages into a `messages.csv` document on request.
//!
//! - [`csv_export`] – byte-exact CSV rendering of [`storage::MessageRecord`]s
//! - [`period`] – preset periods, selection values and free-text range parsing
//! - [`session`] – per-requester dialogue state with expiry
//! - [`dialogue`] – [`ExportDialogue`], the `/export` conversation as a chain handler

pub mod csv_export;
pub mod dialogue;
pub mod period;
pub mod session;

pub use csv_export::{to_csv, CSV_HEADER};
pub use dialogue::{ExportDialogue, EXPORT_COMMAND, EXPORT_FILE_NAME};
pub use period::{parse_custom_range, selection_keyboard, DateRange, ExportPeriod, Selection};
pub use session::{DialogueState, SessionKey, SessionStore};
