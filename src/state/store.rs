//! History persistence.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IcacleanError, Result};

use super::history::RunRecord;

/// Maximum records kept on disk.
const HISTORY_CAP: usize = 200;

/// JSON-backed history store beneath an install root.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    records: Vec<RunRecord>,
}

impl HistoryStore {
    /// Location of the history file for a root.
    pub fn history_path(root: &Path) -> PathBuf {
        root.join(".icaclean").join("history.json")
    }

    /// Load history for a root; a missing or unreadable file yields an
    /// empty store.
    pub fn load(root: &Path) -> Self {
        let path = Self::history_path(root);
        let records = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self { path, records }
    }

    /// Records, oldest first.
    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Append a record and persist, trimming to the cap.
    pub fn append(&mut self, record: RunRecord) -> Result<()> {
        self.records.push(record);
        if self.records.len() > HISTORY_CAP {
            let excess = self.records.len() - HISTORY_CAP;
            self.records.drain(..excess);
        }
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            serde_json::to_string_pretty(&self.records).map_err(|e| IcacleanError::Other(e.into()))?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Append without failing the surrounding run.
    pub fn record_best_effort(root: &Path, record: RunRecord) {
        let mut store = Self::load(root);
        if let Err(e) = store.append(record) {
            tracing::warn!(error = %e, "failed to persist run history");
        }
    }
}
