//! Core PlanStore implementation

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One persisted study-plan generation event
///
/// Immutable once appended; records are only ever removed by clearing the
/// whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    /// Local wall-clock time of generation, `%Y-%m-%d %H:%M:%S`
    pub timestamp: String,
    /// Subjects entered by the user
    pub subjects: String,
    /// Days remaining until the exam
    pub days_left: u32,
    /// Weak topics entered by the user
    pub weak_topics: String,
    /// The generated plan text
    pub plan: String,
}

/// Current local time formatted for PlanRecord::timestamp
pub fn timestamp_now() -> String {
    chrono::Local::now().format(crate::TIMESTAMP_FORMAT).to_string()
}

/// The on-disk plan history
///
/// A single JSON array rewritten in full on every append. Not atomic and not
/// protected against concurrent writers.
pub struct PlanStore {
    /// Path to the history file
    path: PathBuf,
}

impl PlanStore {
    /// Open a plan store backed by the given file, creating parent
    /// directories as needed. The file itself is only created on first
    /// append.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create history directory")?;
        }
        debug!(?path, "Opened plan store");
        Ok(Self { path })
    }

    /// Path to the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record: read the whole array, push, rewrite pretty-printed
    pub fn append(&self, record: &PlanRecord) -> Result<()> {
        let mut records = self.load()?;
        records.push(record.clone());
        let content = serde_json::to_string_pretty(&records).context("Failed to serialize plan history")?;
        fs::write(&self.path, content).context("Failed to write history file")?;
        info!(path = ?self.path, count = records.len(), "Appended plan record");
        Ok(())
    }

    /// Load the full history in insertion order
    ///
    /// A missing file is an empty history; a file that exists but does not
    /// parse as a PlanRecord array is an error.
    pub fn load(&self) -> Result<Vec<PlanRecord>> {
        if !self.path.exists() {
            debug!(path = ?self.path, "History file absent");
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).context("Failed to read history file")?;
        let records: Vec<PlanRecord> =
            serde_json::from_str(&content).context("History file is not a valid plan array")?;
        debug!(path = ?self.path, count = records.len(), "Loaded plan history");
        Ok(records)
    }

    /// Delete the history file; returns whether anything was removed
    pub fn clear(&self) -> Result<bool> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to remove history file")?;
            info!(path = ?self.path, "Cleared plan history");
            return Ok(true);
        }
        debug!(path = ?self.path, "Nothing to clear");
        Ok(false)
    }
}
