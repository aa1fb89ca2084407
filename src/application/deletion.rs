//! Two-phase recording deletion
//!
//! A recording lives in two places that cannot be removed atomically
//! together: the audio file on disk and the metadata record in the store.
//! The coordinator runs both phases on every call, best effort, and
//! reports each result separately so callers can spot orphaned files.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::recording::{AudioFormat, Recording};

use super::ports::{RecordingStore, StoreError};

/// Result of a two-phase delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub file_deleted: bool,
    pub record_deleted: bool,
}

impl DeletionOutcome {
    /// The deletion counts as successful once the record is gone. A
    /// leftover audio file is an orphan, not a failure.
    pub fn succeeded(&self) -> bool {
        self.record_deleted
    }
}

/// Deletes a recording's audio file and its record
pub struct DeletionCoordinator<S: RecordingStore> {
    store: Arc<S>,
}

impl<S: RecordingStore> DeletionCoordinator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Remove the audio file, then the record. A failure in either phase
    /// never blocks the other, and an already-missing file or record
    /// counts as deleted.
    pub async fn delete(&self, recording: &Recording) -> DeletionOutcome {
        let file_deleted = match tokio::fs::remove_file(&recording.file_path).await {
            Ok(()) => true,
            Err(err) if err.kind() == io::ErrorKind::NotFound => true,
            Err(err) => {
                warn!(
                    path = %recording.file_path.display(),
                    error = %err,
                    "failed to delete audio file"
                );
                false
            }
        };

        let record_deleted = match self.store.delete(recording.id).await {
            Ok(()) => true,
            Err(StoreError::NotFound(_)) => true,
            Err(err) => {
                warn!(id = %recording.id, error = %err, "failed to delete record");
                false
            }
        };

        if record_deleted {
            info!(id = %recording.id, name = %recording.name, "recording deleted");
        }

        DeletionOutcome {
            file_deleted,
            record_deleted,
        }
    }

    /// List audio files in `audio_dir` that no record references.
    /// A missing directory means there is nothing to reconcile.
    pub async fn scan_orphans(&self, audio_dir: &Path) -> io::Result<Vec<PathBuf>> {
        let referenced: HashSet<PathBuf> = self
            .store
            .observe_all()
            .borrow()
            .iter()
            .map(|r| r.file_path.clone())
            .collect();

        let mut entries = match tokio::fs::read_dir(audio_dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let mut orphans = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if AudioFormat::from_path(&path).is_none() {
                continue;
            }
            if !referenced.contains(&path) {
                orphans.push(path);
            }
        }
        orphans.sort();
        Ok(orphans)
    }
}
