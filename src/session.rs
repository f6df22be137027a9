//! Session persistence for conversation history.
//!
//! Snapshots the committed history (and the last recorded checkpoint) to a
//! JSON file so a session can be restored after restart. The orchestrator
//! never touches this itself; embedders save after a turn completes and
//! load at startup.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::history::HistoryTurn;

/// Session snapshot stored in session.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub session_id: String,
    pub saved_at: DateTime<Utc>,
    pub history: Vec<HistoryTurn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint_index: Option<usize>,
}

/// On-disk session store.
///
/// Persists snapshots in `<cache_dir>/session.json` (default `~/.chatflow`).
pub struct SessionStore {
    session_path: PathBuf,
}

impl SessionStore {
    /// Create a new session store.
    ///
    /// # Arguments
    /// * `cache_dir` - Optional custom cache directory. Defaults to ~/.chatflow
    pub fn new(cache_dir: Option<String>) -> Result<Self> {
        let base_dir = match cache_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".chatflow"),
        };

        std::fs::create_dir_all(&base_dir)
            .with_context(|| format!("Failed to create cache directory: {:?}", base_dir))?;

        Ok(Self {
            session_path: base_dir.join("session.json"),
        })
    }

    /// Path of the snapshot file.
    pub fn session_path(&self) -> &PathBuf {
        &self.session_path
    }

    /// Save a snapshot of the current history.
    pub fn save(
        &self,
        session_id: &str,
        history: &[HistoryTurn],
        checkpoint_index: Option<usize>,
    ) -> Result<()> {
        let data = SessionData {
            session_id: session_id.to_string(),
            saved_at: Utc::now(),
            history: history.to_vec(),
            checkpoint_index,
        };

        let content =
            serde_json::to_string_pretty(&data).context("Failed to serialize session data")?;

        std::fs::write(&self.session_path, content)
            .with_context(|| format!("Failed to write session file: {:?}", self.session_path))?;

        info!(turns = history.len(), "Session saved");
        debug!("Session saved to {:?}", self.session_path);

        Ok(())
    }

    /// Load the last saved snapshot.
    ///
    /// Returns `Ok(None)` when no snapshot exists. An unreadable or invalid
    /// file is removed and also reported as `Ok(None)`.
    pub fn load(&self) -> Result<Option<SessionData>> {
        if !self.session_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.session_path)
            .with_context(|| format!("Failed to read session file: {:?}", self.session_path))?;

        match serde_json::from_str::<SessionData>(&content) {
            Ok(data) => Ok(Some(data)),
            Err(e) => {
                warn!("Invalid session data found ({e}), removing session file");
                let _ = self.clear();
                Ok(None)
            }
        }
    }

    /// Remove the stored snapshot.
    pub fn clear(&self) -> Result<()> {
        if self.session_path.exists() {
            std::fs::remove_file(&self.session_path).with_context(|| {
                format!("Failed to remove session file: {:?}", self.session_path)
            })?;
            info!("Session cleared");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ChatMessage;
    use serde_json::json;
    use tempfile::tempdir;

    fn turn(text: &str) -> HistoryTurn {
        HistoryTurn {
            message: ChatMessage::user(text),
            context_items: Vec::new(),
            source_document: json!({ "text": text }),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(Some(dir.path().to_string_lossy().to_string())).unwrap()
    }

    #[test]
    fn test_load_without_snapshot() {
        let tmp = tempdir().unwrap();
        let store = store_in(&tmp);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let tmp = tempdir().unwrap();
        let store = store_in(&tmp);

        store
            .save("session-1", &[turn("hello"), turn("again")], Some(2))
            .unwrap();

        let data = store.load().unwrap().unwrap();
        assert_eq!(data.session_id, "session-1");
        assert_eq!(data.history.len(), 2);
        assert_eq!(data.history[0].message.content.render(), "hello");
        assert_eq!(data.checkpoint_index, Some(2));
    }

    #[test]
    fn test_invalid_snapshot_is_removed() {
        let tmp = tempdir().unwrap();
        let store = store_in(&tmp);

        std::fs::write(store.session_path(), "not json at all").unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(!store.session_path().exists());
    }

    #[test]
    fn test_clear() {
        let tmp = tempdir().unwrap();
        let store = store_in(&tmp);

        store.save("session-1", &[turn("hello")], None).unwrap();
        assert!(store.session_path().exists());

        store.clear().unwrap();
        assert!(!store.session_path().exists());
    }
}
