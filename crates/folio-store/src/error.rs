//! Error types for the store module

use thiserror::Error;

pub const SERVER_ERROR_FALLBACK: &str = "Server error.";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Main server URL is not configured")]
    MissingServer,

    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },
}

impl StoreError {
    /// Text stored in a slice's `error` field when a load is rejected.
    pub fn rejection_message(&self) -> String {
        match self {
            StoreError::Api { message, .. } if message.trim().is_empty() => {
                SERVER_ERROR_FALLBACK.to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
