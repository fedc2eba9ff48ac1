//! Relay error types.

use thiserror::Error;

use crate::gemini::ChatError;
use crate::history::HistoryError;

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

/// Errors a relay request can surface to the endpoint.
///
/// Parser faults never appear here: the decision parser absorbs them into
/// its fallback tiers.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The remote chat call failed. Not retried; history is untouched
    /// because it is only written after a reply is obtained.
    #[error("remote chat service: {0}")]
    Remote(#[from] ChatError),

    /// The user's stored history could not be read. Fatal for the request;
    /// the history is never reset to empty.
    #[error("history unreadable: {0}")]
    History(#[source] HistoryError),

    /// The decision was computed but could not be durably recorded. Surfaced
    /// distinctly so the caller knows history continuity broke.
    #[error("decision computed but history not recorded: {0}")]
    NotRecorded(#[source] HistoryError),
}
