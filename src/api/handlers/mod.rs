//! API request handlers.

/// Health, source listing and service info handlers.
pub mod health;
/// Research handler.
pub mod research;
