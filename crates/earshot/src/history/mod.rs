//! Per-user conversation transcripts.
//!
//! Each user's transcript lives in one JSON document on disk, keyed by a
//! sanitized form of the caller-supplied user id. The store serializes
//! read-modify-write cycles per user and publishes every save atomically, so
//! a crashed write leaves the previous transcript readable.

mod error;
mod store;

pub use error::{HistoryError, HistoryResult};
pub use store::HistoryStore;
