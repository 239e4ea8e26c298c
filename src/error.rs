//! Error types for the dynasty simulation core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DynastyError>;

#[derive(Error, Debug)]
pub enum DynastyError {
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invariant violation: {message}")]
    InvariantViolation { message: String },

    #[error("dynasty not found: {dynasty_id}")]
    DynastyNotFound { dynasty_id: String },

    #[error("event not found: {event_id}")]
    EventNotFound { event_id: String },

    #[error("event handler failed for {event_id}: {message}")]
    HandlerFailed { event_id: String, message: String },

    #[error("generation failed: {message}")]
    GenerationFailed { message: String },

    #[error("interactive milestone cancelled")]
    Cancelled,

    #[error("invalid calendar date: {message}")]
    InvalidDate { message: String },
}

impl DynastyError {
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationFailed {
            message: message.into(),
        }
    }
}
