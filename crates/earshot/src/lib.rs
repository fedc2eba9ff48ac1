//! Earshot backend library.
//!
//! This library provides the core components of the Earshot relay: the HTTP
//! API, the per-user transcript store, the remote chat model client, and the
//! relay service that ties them together.

pub mod api;
pub mod gemini;
pub mod history;
pub mod relay;
