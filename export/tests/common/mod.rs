//! Shared helpers for export integration tests.

pub mod mock_bot;
