//! Run identity and history recording.
//!
//! Every executed pipeline command appends a record to
//! `.icaclean/history.json` beneath the install root. History is
//! best-effort: a failure to persist it is logged as a warning and never
//! fails the run. Dry runs are not recorded.

pub mod history;
pub mod store;

pub use history::{dataset_id, RunRecord, RunRecordBuilder, RunStatus, StageRecord};
pub use store::HistoryStore;
