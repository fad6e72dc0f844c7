//! Error types for the chat module

use thiserror::Error;

/// Chat module error types
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Chat backend URL is not configured")]
    MissingBackend,

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from chat backend")]
    Status { status: u16 },

    #[error("Unexpected content type: {0}")]
    ContentType(String),

    #[error("Malformed event payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Event stream closed by server")]
    StreamClosed,
}

/// Result type alias for chat operations
pub type Result<T> = std::result::Result<T, ChatError>;
