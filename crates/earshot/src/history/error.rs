//! History store error types.

use thiserror::Error;

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors that can occur while reading or writing a transcript.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A transcript exists on disk but cannot be decoded. Never downgraded
    /// to an empty history.
    #[error("corrupt transcript for user {user_id}: {source}")]
    Corrupt {
        user_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reading the backing file failed for a reason other than absence.
    #[error("reading transcript for user {user_id}: {source}")]
    Read {
        user_id: String,
        #[source]
        source: std::io::Error,
    },

    /// Persisting the transcript failed.
    #[error("writing transcript for user {user_id}: {source}")]
    Write {
        user_id: String,
        #[source]
        source: std::io::Error,
    },
}
