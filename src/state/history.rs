//! Run history records.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::stages::StageOutcome;

/// Stable identifier for an input dataset.
///
/// Derived from the dataset path so repeated runs over the same ICA
/// directory group together in history.
pub fn dataset_id(path: &Path) -> String {
    let canonical = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());
    let digest = Sha256::digest(canonical.to_string_lossy().as_bytes());
    hex::encode(digest)[..12].to_string()
}

/// Status of a recorded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failed,
}

/// One executed stage inside a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    pub name: String,
    pub duration_ms: u64,
}

/// A record of a single pipeline command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Identifier: `run_<millis>_<dataset prefix>`.
    pub id: String,

    /// When the run started.
    pub timestamp: DateTime<Utc>,

    /// Subcommand that ran (prepare, extract, classify, apply, run).
    pub command: String,

    /// Dataset identifier.
    pub dataset: String,

    /// Total duration in milliseconds.
    pub duration_ms: u64,

    /// Overall status.
    pub status: RunStatus,

    /// Stages that executed, in order.
    pub stages: Vec<StageRecord>,

    /// Error message if failed.
    pub error: Option<String>,
}

/// Builds a run record during execution.
pub struct RunRecordBuilder {
    command: String,
    dataset: String,
    start: DateTime<Utc>,
    stages: Vec<StageRecord>,
}

impl RunRecordBuilder {
    /// Start recording a run over a dataset path.
    pub fn start(command: &str, dataset_path: &Path) -> Self {
        Self {
            command: command.to_string(),
            dataset: dataset_id(dataset_path),
            start: Utc::now(),
            stages: Vec::new(),
        }
    }

    /// Record a completed stage.
    pub fn stage(&mut self, outcome: &StageOutcome) {
        if outcome.executed {
            self.stages.push(StageRecord {
                name: outcome.name.to_string(),
                duration_ms: outcome.duration.as_millis() as u64,
            });
        }
    }

    /// Finish with success.
    pub fn finish_success(self) -> RunRecord {
        self.finish(RunStatus::Success, None)
    }

    /// Finish with failure.
    pub fn finish_failed(self, error: &str) -> RunRecord {
        self.finish(RunStatus::Failed, Some(error.to_string()))
    }

    fn finish(self, status: RunStatus, error: Option<String>) -> RunRecord {
        let id = format!(
            "run_{}_{}",
            self.start.timestamp_millis(),
            &self.dataset[..6.min(self.dataset.len())]
        );
        RunRecord {
            id,
            timestamp: self.start,
            command: self.command,
            dataset: self.dataset,
            duration_ms: (Utc::now() - self.start).num_milliseconds().max(0) as u64,
            status,
            stages: self.stages,
            error,
        }
    }
}
