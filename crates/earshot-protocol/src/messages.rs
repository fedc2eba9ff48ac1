//! Canonical message types.
//!
//! These are the persistent and wire-visible units of a relay exchange: the
//! request a device sends, the decision it gets back, and the turns stored in
//! a user's transcript.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human wearing the device.
    User,
    /// The remote chat model.
    Model,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
        }
    }
}

/// One utterance in a conversation. Immutable once appended to a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who said it.
    pub role: Role,
    /// What was said. May be empty for a model turn when the assistant
    /// decided to stay silent.
    pub text: String,
}

impl Turn {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create a model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// The decision returned to the device for every `/chat` call.
///
/// Field names are camelCase on the wire; the device firmware matches them
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// Whether the assistant should speak at all.
    pub should_respond: bool,
    /// What it should say. Always empty when `should_respond` is false.
    pub response_text: String,
}

impl Decision {
    /// The stay-quiet decision.
    pub fn silent() -> Self {
        Self {
            should_respond: false,
            response_text: String::new(),
        }
    }

    /// A decision to speak.
    pub fn respond(text: impl Into<String>) -> Self {
        Self {
            should_respond: true,
            response_text: text.into(),
        }
    }

    /// Re-enforce the silence invariant: a non-responding decision carries no
    /// text, whatever the model claimed.
    pub fn normalized(mut self) -> Self {
        if !self.should_respond {
            self.response_text.clear();
        }
        self
    }
}

/// Request body for `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Opaque identifier of the conversation owner.
    pub user_id: String,
    /// The transcribed utterance, exactly as heard.
    pub user_message: String,
}

/// Request body for the `POST /receive-text` diagnostic endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveTextRequest {
    pub text: String,
}

/// Response body for `POST /receive-text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveTextResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_wire_names() {
        let json = serde_json::to_value(Decision::respond("hello")).unwrap();
        assert_eq!(json["shouldRespond"], true);
        assert_eq!(json["responseText"], "hello");
    }

    #[test]
    fn test_decision_normalized_clears_text() {
        let decision = Decision {
            should_respond: false,
            response_text: "should not leak".to_string(),
        };
        assert_eq!(decision.normalized(), Decision::silent());
    }

    #[test]
    fn test_normalized_keeps_responding_text() {
        let decision = Decision::respond("keep me").normalized();
        assert_eq!(decision.response_text, "keep me");
    }

    #[test]
    fn test_role_round_trip() {
        let turn = Turn::model("hi");
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains(r#""role":"model""#));
        let back: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, turn);
    }
}
