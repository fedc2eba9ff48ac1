//! API request handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::info;

use earshot_protocol::{ChatRequest, Decision, ReceiveTextRequest, ReceiveTextResponse};

use super::error::ApiResult;
use super::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Relay one utterance to the chat model and return the decision.
///
/// A silent decision is a normal 200: silence is a valid answer, not an
/// error.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<Decision>> {
    let decision = state
        .relay
        .handle(&request.user_id, &request.user_message)
        .await?;
    Ok(Json(decision))
}

/// Diagnostic echo endpoint. No history, no model call.
pub async fn receive_text(Json(request): Json<ReceiveTextRequest>) -> Json<ReceiveTextResponse> {
    info!("Received text: {}", request.text);
    Json(ReceiveTextResponse {
        message: format!("Text received: {}", request.text),
    })
}
