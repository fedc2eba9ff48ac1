//! Gemini HTTP client.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use earshot_protocol::Turn;

use super::error::{ChatError, ChatResult};
use super::types::*;

/// Default request timeout. The remote call is the only long-latency
/// operation in a relay request, so it must be bounded.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the hosted Gemini chat service.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    /// HTTP client.
    client: Client,
    /// Base URL (e.g., "https://generativelanguage.googleapis.com").
    base_url: String,
    /// Model name (e.g., "gemini-1.5-flash").
    model: String,
    /// API key.
    api_key: String,
}

impl GeminiClient {
    /// Create a new client with the default timeout.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self::with_timeout(base_url, model, api_key, DEFAULT_TIMEOUT)
    }

    /// Create a new client with a custom request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Send one message on top of prior turns and return the raw reply text.
    pub async fn generate(&self, history: &[Turn], message: &str) -> ChatResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let request = GenerateContentRequest::from_history(history, message);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ChatError::ConnectionFailed {
                        url: url.clone(),
                        message: e.to_string(),
                    }
                } else {
                    ChatError::from(e)
                }
            })?;

        let body = self.handle_response(response).await?;
        body.reply_text().ok_or(ChatError::EmptyReply)
    }

    /// Handle response and parse JSON or error.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> ChatResult<GenerateContentResponse> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ChatError::Parse(format!("Failed to parse response: {}", e)));
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ChatError::Unauthorized),
            _ => {
                let message = match response.json::<ApiErrorResponse>().await {
                    Ok(body) => body.error.message,
                    Err(e) => format!("unreadable error body: {}", e),
                };
                Err(ChatError::Api {
                    message,
                    status: status.as_u16(),
                })
            }
        }
    }
}
