//! Conversational relay.
//!
//! Orchestrates one `/chat` request end to end: load the user's transcript,
//! wrap the utterance in the behavioral policy prompt, call the remote chat
//! model, parse its free-text reply into a well-formed decision, and persist
//! the updated transcript.

mod decision;
mod error;
mod policy;
mod service;

pub use decision::parse_decision;
pub use error::{RelayError, RelayResult};
pub use policy::{DEFAULT_POLICY_PROMPT, compose_prompt};
pub use service::RelayService;
