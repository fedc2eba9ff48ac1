//! Test utilities and common setup.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use tempfile::TempDir;
use tokio::sync::Mutex;

use earshot::api::{self, AppState};
use earshot::gemini::{ChatModel, ChatResult};
use earshot::history::HistoryStore;
use earshot::relay::RelayService;
use earshot_protocol::Turn;

/// Chat model standing in for the remote service: returns canned replies in
/// order and records the history length seen on each call.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<ChatResult<String>>>,
    seen_history_lens: Mutex<Vec<usize>>,
}

impl ScriptedModel {
    pub fn new(replies: impl IntoIterator<Item = ChatResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            seen_history_lens: Mutex::new(Vec::new()),
        })
    }

    /// History lengths observed across calls, in call order.
    pub async fn seen_history_lens(&self) -> Vec<usize> {
        self.seen_history_lens.lock().await.clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn send_message(&self, history: &[Turn], _message: &str) -> ChatResult<String> {
        self.seen_history_lens.lock().await.push(history.len());
        self.replies
            .lock()
            .await
            .pop_front()
            .expect("scripted model ran out of replies")
    }
}

/// A test application plus handles to look behind it.
pub struct TestContext {
    pub app: Router,
    pub store: HistoryStore,
    pub model: Arc<ScriptedModel>,
    _history_dir: TempDir,
}

/// Create a test application with a scripted chat model and a throwaway
/// history directory.
pub fn test_app(replies: impl IntoIterator<Item = ChatResult<String>>) -> TestContext {
    let history_dir = TempDir::new().unwrap();
    let store = HistoryStore::new(history_dir.path());
    let model = ScriptedModel::new(replies);

    let relay = RelayService::new(store.clone(), model.clone(), "POLICY");
    let state = AppState::new(relay, Vec::new());

    TestContext {
        app: api::create_router(state),
        store,
        model,
        _history_dir: history_dir,
    }
}
