//! Local snapshot of the last known task set.
//!
//! The file is a cache, never a source of truth: it is overwritten wholesale
//! after every change and only trusted on open while it is fresh.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use daily_planner_core::{PlanDate, Task};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::SnapshotError;

/// Persisted planner state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Date the tasks were fetched for.
    pub date: Option<PlanDate>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// When `tasks` last matched the store.
    pub last_synced: Option<DateTime<Utc>>,
    /// Whether `tasks` was edited locally since `last_synced`.
    #[serde(default)]
    pub local_edits: bool,
}

impl Snapshot {
    /// Whether this snapshot can stand in for a fetch of `date` at `now`.
    ///
    /// It must hold tasks, have been fetched for that date, and be at most
    /// `max_age` old. Timestamps in the future count as stale.
    #[must_use]
    pub fn is_fresh_for(&self, date: PlanDate, now: DateTime<Utc>, max_age: Duration) -> bool {
        if self.tasks.is_empty() || self.date != Some(date) {
            return false;
        }

        self.last_synced.is_some_and(|synced| {
            now.signed_duration_since(synced)
                .to_std()
                .is_ok_and(|age| age <= max_age)
        })
    }
}

/// Reads and writes the snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot. A missing file is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<Snapshot>, SnapshotError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(serde_json::from_reader(std::io::BufReader::new(file))?))
    }

    /// Replace the snapshot file with `snapshot`.
    ///
    /// The new contents go to a uniquely named temporary file in the same
    /// directory, are synced to disk, and then renamed over the old file.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be written.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut file = NamedTempFile::new_in(parent)?;
        serde_json::to_writer(&mut file, snapshot)?;
        file.as_file().sync_all()?;
        file.persist(&self.path)?;

        tracing::trace!(
            path = %self.path.display(),
            tasks = snapshot.tasks.len(),
            "Snapshot saved"
        );
        Ok(())
    }
}
