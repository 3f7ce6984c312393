//! # Handlers for the archive bot
//!
//! This crate provides handler implementations: logging and persistence.

mod logging;
mod persistence_handler;

#[cfg(test)]
mod test;

pub use logging::LoggingHandler;
pub use persistence_handler::PersistenceHandler;
