//! File-backed transcript store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::{Mutex, OwnedMutexGuard};

use earshot_protocol::Turn;

use super::{HistoryError, HistoryResult};

/// On-disk envelope around a transcript.
#[derive(Debug, Serialize, Deserialize)]
struct TranscriptFile {
    /// When the transcript was last saved.
    updated_at: DateTime<Utc>,
    /// The ordered turn sequence.
    turns: Vec<Turn>,
}

/// File-backed store for per-user transcripts.
///
/// One JSON document per sanitized user id under `base_dir`. Transcripts are
/// never expired or deleted by the store.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    /// Directory holding the transcript files.
    base_dir: PathBuf,
    /// Sanitized user id -> lock serializing that user's load/save cycle.
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl HistoryStore {
    /// Create a new store rooted at `base_dir`. The directory is created
    /// lazily on first save.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Acquire the per-user mutex guarding the load-modify-save cycle.
    ///
    /// Callers must hold the guard across the whole cycle; two concurrent
    /// updates for the same user would otherwise overwrite each other.
    /// Ids that sanitize to the same key share a lock, since they share a
    /// file.
    pub async fn lock_user(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let key = sanitize_user_id(user_id);
        let lock = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Load the transcript for a user.
    ///
    /// A user with no transcript yet gets an empty one; an unreadable or
    /// undecodable file is an error.
    pub async fn load(&self, user_id: &str) -> HistoryResult<Vec<Turn>> {
        let path = self.path_for(user_id);

        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(HistoryError::Read {
                    user_id: user_id.to_string(),
                    source: e,
                });
            }
        };

        let file: TranscriptFile =
            serde_json::from_str(&contents).map_err(|e| HistoryError::Corrupt {
                user_id: user_id.to_string(),
                source: e,
            })?;

        Ok(file.turns)
    }

    /// Persist the full transcript for a user, replacing prior contents.
    ///
    /// The document is written to a sibling temp file and renamed over the
    /// target, so a failed save leaves either the old or the new transcript
    /// readable, never a torn one.
    pub async fn save(&self, user_id: &str, turns: &[Turn]) -> HistoryResult<()> {
        let path = self.path_for(user_id);

        let write_err = |e: std::io::Error| HistoryError::Write {
            user_id: user_id.to_string(),
            source: e,
        };

        fs::create_dir_all(&self.base_dir).await.map_err(write_err)?;

        let file = TranscriptFile {
            updated_at: Utc::now(),
            turns: turns.to_vec(),
        };
        let body = serde_json::to_vec_pretty(&file)
            .map_err(|e| write_err(std::io::Error::other(e)))?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, &body).await.map_err(write_err)?;
        fs::rename(&tmp_path, &path).await.map_err(write_err)?;

        debug!(
            "Saved {} turn(s) for user {} to {}",
            turns.len(),
            user_id,
            path.display()
        );
        Ok(())
    }

    /// Full path of a user's transcript file.
    fn path_for(&self, user_id: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}_history.json", sanitize_user_id(user_id)))
    }

    /// Directory the store writes into.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Map a caller-supplied user id to a safe file stem.
///
/// Path separators and other path-hostile characters become underscores, so
/// no id can escape the store's directory or collide across directory
/// boundaries. The mapping is deterministic; distinct ids that only differ in
/// hostile characters intentionally share a transcript.
fn sanitize_user_id(user_id: &str) -> String {
    let sanitized: String = user_id
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (HistoryStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path());
        (store, dir)
    }

    #[tokio::test]
    async fn test_missing_user_loads_empty() {
        let (store, _dir) = test_store();
        let turns = store.load("nobody").await.unwrap();
        assert!(turns.is_empty());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let (store, _dir) = test_store();

        let turns = vec![
            Turn::user("what's the capital of Brazil"),
            Turn::model("Brasília."),
            Turn::user("thanks"),
            Turn::model(""),
        ];
        store.save("alice", &turns).await.unwrap();

        let loaded = store.load("alice").await.unwrap();
        assert_eq!(loaded, turns);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let (store, _dir) = test_store();

        store.save("bob", &[Turn::user("one")]).await.unwrap();
        store
            .save("bob", &[Turn::user("one"), Turn::model("two")])
            .await
            .unwrap();

        let loaded = store.load("bob").await.unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let (store, dir) = test_store();

        std::fs::write(dir.path().join("eve_history.json"), "{ not json").unwrap();

        let err = store.load("eve").await.unwrap_err();
        assert!(matches!(err, HistoryError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let (store, dir) = test_store();

        store.save("carol", &[Turn::user("hi")]).await.unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_path_hostile_ids_stay_inside_the_store() {
        let (store, dir) = test_store();

        store
            .save("../../etc/passwd", &[Turn::user("hi")])
            .await
            .unwrap();

        // Everything written must land directly under the base dir.
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].path().is_file());
    }

    #[test]
    fn test_sanitize_user_id() {
        assert_eq!(sanitize_user_id("alice"), "alice");
        assert_eq!(sanitize_user_id("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_user_id(""), "_");
    }

    #[tokio::test]
    async fn test_lock_serializes_same_user() {
        let (store, _dir) = test_store();

        let guard = store.lock_user("dave").await;
        // A second lock for the same user must wait for the first guard.
        let store2 = store.clone();
        let pending = tokio::spawn(async move {
            let _guard = store2.lock_user("dave").await;
        });

        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        drop(guard);
        pending.await.unwrap();
    }
}
