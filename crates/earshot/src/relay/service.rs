//! Relay service - orchestrates one chat request end to end.

use std::sync::Arc;

use tracing::{debug, info};

use earshot_protocol::{Decision, Turn};

use crate::gemini::ChatModel;
use crate::history::HistoryStore;

use super::decision::parse_decision;
use super::error::{RelayError, RelayResult};
use super::policy::compose_prompt;

/// Service relaying device utterances to the chat model.
///
/// Holds no per-request state: each `handle` call loads, mutates, and saves
/// one user's transcript under that user's lock.
#[derive(Clone)]
pub struct RelayService {
    store: HistoryStore,
    model: Arc<dyn ChatModel>,
    policy_prompt: Arc<str>,
}

impl RelayService {
    /// Create a new relay service.
    pub fn new(
        store: HistoryStore,
        model: Arc<dyn ChatModel>,
        policy_prompt: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            store,
            model,
            policy_prompt: policy_prompt.into(),
        }
    }

    /// Handle one utterance: returns the decision and appends the user/model
    /// turn pair to the transcript.
    ///
    /// Exactly one history load, one outbound model call, and one history
    /// save per invocation. The per-user lock spans all three, so concurrent
    /// requests for the same user serialize instead of overwriting each
    /// other's turns; other users proceed in parallel.
    pub async fn handle(&self, user_id: &str, user_message: &str) -> RelayResult<Decision> {
        let _guard = self.store.lock_user(user_id).await;

        let mut turns = self
            .store
            .load(user_id)
            .await
            .map_err(RelayError::History)?;
        debug!(
            "loaded {} prior turn(s) for user {}",
            turns.len(),
            user_id
        );

        let prompt = compose_prompt(&self.policy_prompt, user_message);
        let raw = self.model.send_message(&turns, &prompt).await?;

        let decision = parse_decision(&raw);
        info!(
            "decision for user {}: respond={}",
            user_id, decision.should_respond
        );

        // The transcript records the original utterance, not the
        // policy-augmented prompt. A silent decision still appends an empty
        // model turn to preserve turn pairing for future context.
        turns.push(Turn::user(user_message));
        turns.push(Turn::model(decision.response_text.clone()));

        self.store
            .save(user_id, &turns)
            .await
            .map_err(RelayError::NotRecorded)?;

        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    use crate::gemini::{ChatError, ChatResult};

    use super::*;

    /// Chat model returning canned replies in order.
    struct ScriptedModel {
        replies: Mutex<VecDeque<ChatResult<String>>>,
    }

    impl ScriptedModel {
        fn new(replies: impl IntoIterator<Item = ChatResult<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().collect()),
            })
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn send_message(&self, _history: &[Turn], _message: &str) -> ChatResult<String> {
            self.replies
                .lock()
                .await
                .pop_front()
                .expect("scripted model ran out of replies")
        }
    }

    fn test_relay(replies: impl IntoIterator<Item = ChatResult<String>>) -> (RelayService, HistoryStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path());
        let relay = RelayService::new(store.clone(), ScriptedModel::new(replies), "POLICY");
        (relay, store, dir)
    }

    #[tokio::test]
    async fn test_handle_appends_original_message_pair() {
        let (relay, store, _dir) = test_relay([Ok(
            r#"{"shouldRespond": true, "responseText": "Brasília."}"#.to_string(),
        )]);

        let decision = relay.handle("alice", "what's the capital of Brazil").await.unwrap();
        assert_eq!(decision, Decision::respond("Brasília."));

        let turns = store.load("alice").await.unwrap();
        assert_eq!(turns.len(), 2);
        // The stored user turn is the literal utterance, not the
        // policy-augmented prompt.
        assert_eq!(turns[0], Turn::user("what's the capital of Brazil"));
        assert_eq!(turns[1], Turn::model("Brasília."));
    }

    #[tokio::test]
    async fn test_silent_decision_still_records_empty_model_turn() {
        let (relay, store, _dir) = test_relay([Ok("I'm not sure".to_string())]);

        let decision = relay.handle("bob", "mumbling to myself").await.unwrap();
        assert_eq!(decision, Decision::silent());

        let turns = store.load("bob").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1], Turn::model(""));
    }

    #[tokio::test]
    async fn test_remote_failure_leaves_history_unchanged() {
        let (relay, store, _dir) = test_relay([
            Ok(r#"{"shouldRespond": false, "responseText": ""}"#.to_string()),
            Err(ChatError::ConnectionFailed {
                url: "http://example.invalid".to_string(),
                message: "connection refused".to_string(),
            }),
        ]);

        relay.handle("carol", "first").await.unwrap();
        let before = store.load("carol").await.unwrap();

        let err = relay.handle("carol", "second").await.unwrap_err();
        assert!(matches!(err, RelayError::Remote(_)));

        let after = store.load("carol").await.unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_concurrent_same_user_requests_both_persist() {
        let (relay, store, _dir) = test_relay([
            Ok(r#"{"shouldRespond": true, "responseText": "one"}"#.to_string()),
            Ok(r#"{"shouldRespond": true, "responseText": "two"}"#.to_string()),
        ]);

        let (first, second) = tokio::join!(
            relay.handle("dave", "question one"),
            relay.handle("dave", "question two"),
        );
        first.unwrap();
        second.unwrap();

        let turns = store.load("dave").await.unwrap();
        assert_eq!(turns.len(), 4);
        // Both user turns survive, in some serialization order.
        let texts: Vec<&str> = turns.iter().map(|t| t.text.as_str()).collect();
        assert!(texts.contains(&"question one"));
        assert!(texts.contains(&"question two"));
    }

    #[tokio::test]
    async fn test_corrupt_history_is_fatal() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("eve_history.json"), "{ nope").unwrap();

        let store = HistoryStore::new(dir.path());
        let relay = RelayService::new(
            store,
            ScriptedModel::new([Ok("{}".to_string())]),
            "POLICY",
        );

        let err = relay.handle("eve", "hello").await.unwrap_err();
        assert!(matches!(err, RelayError::History(_)));
    }
}
