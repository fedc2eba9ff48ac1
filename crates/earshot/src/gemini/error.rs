//! Chat client error types.

use thiserror::Error;

/// Result type for chat model operations.
pub type ChatResult<T> = Result<T, ChatError>;

/// Errors that can occur while talking to the remote chat service.
#[derive(Debug, Error)]
pub enum ChatError {
    /// HTTP request failed (network error, timeout).
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The service returned an error response.
    #[error("chat service error: {message} (status: {status})")]
    Api { message: String, status: u16 },

    /// Unauthorized (invalid or missing API key).
    #[error("unauthorized: invalid API key")]
    Unauthorized,

    /// The service answered but produced no reply text.
    #[error("chat service returned an empty reply")]
    EmptyReply,

    /// Failed to parse the response body.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("failed to connect to chat service at {url}: {message}")]
    ConnectionFailed { url: String, message: String },
}
