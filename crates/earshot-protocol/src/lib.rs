//! Canonical wire types for Earshot.
//!
//! Everything in this crate is part of the JSON contract between the device
//! client, the relay backend, and the transcripts it persists. Keep changes
//! backward compatible: device firmware updates lag the backend by weeks.

mod messages;

pub use messages::{
    ChatRequest, Decision, ReceiveTextRequest, ReceiveTextResponse, Role, Turn,
};
