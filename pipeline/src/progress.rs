//! Checkpoint persistence for interruptible fetch runs.
//!
//! The store is an explicit interface injected into the collector, so the
//! fetch logic never touches file paths directly and tests can point it at
//! a throwaway location.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use gm_match::CongressEvent;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from checkpoint persistence.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("checkpoint I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("checkpoint is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resumable fetch progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Event IDs whose detail has already been fetched.
    #[serde(default)]
    pub processed_ids: HashSet<String>,

    /// Events kept so far.
    #[serde(default)]
    pub events: Vec<CongressEvent>,

    /// Congresses fully processed.
    #[serde(default)]
    pub completed_congresses: Vec<u16>,
}

/// Load/save interface for [`ProgressState`].
pub trait ProgressStore: Send + Sync {
    /// The saved state, or `None` when no checkpoint exists.
    ///
    /// # Errors
    /// Returns an error when the checkpoint exists but cannot be read or
    /// parsed.
    fn load(&self) -> Result<Option<ProgressState>, ProgressError>;

    /// Persist the state, replacing any previous checkpoint.
    ///
    /// # Errors
    /// Returns an error when the state cannot be written.
    fn save(&self, state: &ProgressState) -> Result<(), ProgressError>;

    /// Remove the checkpoint after a completed run.
    ///
    /// # Errors
    /// Returns an error when an existing checkpoint cannot be removed.
    fn clear(&self) -> Result<(), ProgressError>;
}

/// JSON-file checkpoint store.
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProgressStore for JsonProgressStore {
    fn load(&self) -> Result<Option<ProgressState>, ProgressError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, state: &ProgressState) -> Result<(), ProgressError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec(state)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ProgressError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_none_without_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProgressStore::new(dir.path().join(".checkpoint.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn state_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProgressStore::new(dir.path().join(".checkpoint.json"));

        let mut state = ProgressState::default();
        state.processed_ids.insert("115538".into());
        state.completed_congresses.push(118);

        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), Some(state));
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProgressStore::new(dir.path().join("nested/dir/.checkpoint.json"));
        store.save(&ProgressState::default()).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn clear_removes_checkpoint_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProgressStore::new(dir.path().join(".checkpoint.json"));

        store.save(&ProgressState::default()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);

        // Clearing again is fine.
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_checkpoint_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".checkpoint.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonProgressStore::new(path);
        assert!(matches!(store.load(), Err(ProgressError::Json(_))));
    }
}
