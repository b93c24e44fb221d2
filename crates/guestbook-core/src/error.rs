//! Error types shared across the guestbook crates.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GuestbookError>;

#[derive(Debug, Error)]
pub enum GuestbookError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The store answered, but the command failed (wrong type, bad reply...).
    #[error("Store error: {0}")]
    Store(String),

    /// The store could not be reached at all.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Invalid outbox counter for {recipient}: {value:?}")]
    InvalidCounter { recipient: String, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
