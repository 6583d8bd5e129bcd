//! Saved-progress snapshots.
//!
//! An in-progress session is kept in a single key-value slot as JSON so it
//! can be resumed later. A missing or unreadable snapshot always means
//! "no saved session"; it is never an error for the caller.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Question;
use crate::session::Session;

/// Storage key of the single progress slot.
pub const PROGRESS_KEY: &str = "quizProgress";

/// Name recorded when the source file is unknown.
pub const DEFAULT_QUIZ_NAME: &str = "已保存的測驗";

/// A key-value store holding snapshot JSON.
pub trait SnapshotStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Persisted form of an unsubmitted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub questions: Vec<Question>,
    #[serde(default)]
    pub selected_options: BTreeMap<u32, String>,
    #[serde(default)]
    pub current_question_index: usize,
    #[serde(default = "default_quiz_name")]
    pub quiz_file_name: String,
    /// Seconds left on the timer; absent for untimed sessions.
    #[serde(default)]
    pub time_left: Option<u32>,
}

fn default_quiz_name() -> String {
    DEFAULT_QUIZ_NAME.to_string()
}

impl ProgressSnapshot {
    /// Capture a session's resumable state.
    pub fn capture(session: &Session, quiz_file_name: &str, time_left: Option<u32>) -> Self {
        Self {
            questions: session.questions().to_vec(),
            selected_options: session.answers().clone(),
            current_question_index: session.current_index(),
            quiz_file_name: quiz_file_name.to_string(),
            time_left,
        }
    }
}

/// Write a snapshot into the progress slot.
pub fn save_snapshot(store: &dyn SnapshotStore, snapshot: &ProgressSnapshot) -> Result<()> {
    let json = serde_json::to_string(snapshot).context("failed to serialize progress")?;
    store.set(PROGRESS_KEY, &json)
}

/// Read the progress slot. Missing, unreadable, or corrupt data yields `None`.
pub fn load_snapshot(store: &dyn SnapshotStore) -> Option<ProgressSnapshot> {
    let raw = match store.get(PROGRESS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("could not read saved progress: {e:#}");
            return None;
        }
    };

    match serde_json::from_str::<ProgressSnapshot>(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!("ignoring corrupt saved progress: {e}");
            None
        }
    }
}

/// Peek at the saved quiz without restoring it, for "continue?" prompts.
pub fn saved_quiz_name(store: &dyn SnapshotStore) -> Option<String> {
    load_snapshot(store)
        .filter(|s| !s.questions.is_empty())
        .map(|s| s.quiz_file_name)
}

/// Empty the progress slot.
pub fn clear_snapshot(store: &dyn SnapshotStore) -> Result<()> {
    store.remove(PROGRESS_KEY)
}

/// In-memory store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// Directory-backed store: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuizOption;

    fn session() -> Session {
        let questions = (1..=3)
            .map(|id| Question {
                id,
                text: format!("Q{id}"),
                options: vec![QuizOption::new("A", "a"), QuizOption::new("B", "b")],
                answer: "A".into(),
            })
            .collect();
        let mut session = Session::new(questions).unwrap();
        session.select(1, "B").unwrap();
        session.select(3, "A").unwrap();
        session.go_to(2);
        session
    }

    #[test]
    fn snapshot_json_shape() {
        let snapshot = ProgressSnapshot::capture(&session(), "bank.csv", Some(90));
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["selectedOptions"]["1"], "B");
        assert_eq!(json["currentQuestionIndex"], 2);
        assert_eq!(json["quizFileName"], "bank.csv");
        assert_eq!(json["timeLeft"], 90);
        assert_eq!(json["questions"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let json = r#"{"questions": [{"id": 1, "text": "Q", "options": [{"key": "A", "text": "a"}], "answer": "A"}]}"#;
        let snapshot: ProgressSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.selected_options.is_empty());
        assert_eq!(snapshot.current_question_index, 0);
        assert_eq!(snapshot.quiz_file_name, DEFAULT_QUIZ_NAME);
        assert_eq!(snapshot.time_left, None);
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(load_snapshot(&store).is_none());

        let snapshot = ProgressSnapshot::capture(&session(), "bank.csv", None);
        save_snapshot(&store, &snapshot).unwrap();
        assert_eq!(load_snapshot(&store), Some(snapshot));
        assert_eq!(saved_quiz_name(&store).as_deref(), Some("bank.csv"));

        clear_snapshot(&store).unwrap();
        assert!(load_snapshot(&store).is_none());
    }

    #[test]
    fn corrupt_snapshot_is_ignored() {
        let store = MemoryStore::new();
        store.set(PROGRESS_KEY, "{not json").unwrap();
        assert!(load_snapshot(&store).is_none());
        assert!(saved_quiz_name(&store).is_none());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state"));

        let snapshot = ProgressSnapshot::capture(&session(), "bank.csv", Some(10));
        save_snapshot(&store, &snapshot).unwrap();
        assert!(dir.path().join("state").join("quizProgress.json").exists());
        assert_eq!(load_snapshot(&store), Some(snapshot));

        clear_snapshot(&store).unwrap();
        clear_snapshot(&store).unwrap();
        assert!(load_snapshot(&store).is_none());
    }
}
