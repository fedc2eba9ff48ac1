//! Remote chat model client module.
//!
//! Provides an async client for the hosted Gemini chat service, plus the
//! trait boundary the relay consumes.

use async_trait::async_trait;

mod client;
mod error;
mod types;

pub use client::GeminiClient;
pub use error::{ChatError, ChatResult};
pub use types::*;

use earshot_protocol::Turn;

/// Minimal chat model abstraction for testability.
///
/// The hosted API is stateless: a "session" is exactly the prior turns
/// shipped with each call, so an empty `history` starts a fresh conversation
/// with no memory.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one message in the context of `history` and return the model's
    /// raw textual reply.
    async fn send_message(&self, history: &[Turn], message: &str) -> ChatResult<String>;
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn send_message(&self, history: &[Turn], message: &str) -> ChatResult<String> {
        self.generate(history, message).await
    }
}
