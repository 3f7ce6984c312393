//! Storage error types.
//!
//! Callers distinguish "could not connect" from "query failed" by variant.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A required database setting is missing or unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Database call timed out after {0:?}")]
    Timeout(Duration),
}
