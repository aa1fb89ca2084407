//! Recording registration and naming use cases
//!
//! Creation is keyed by audio file path: naming the same captured file
//! again updates the existing record instead of growing a duplicate.

use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::recording::{Recording, TranscriptionStatus};

use super::ports::{RecordingStore, StoreError};

/// Errors from the naming use cases
#[derive(Debug, Error)]
pub enum NamingError {
    #[error("Recording name must not be empty")]
    EmptyName,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Register a captured file before the user has named it.
///
/// Upsert by path: an existing record is returned untouched, otherwise a
/// placeholder with an empty name and status `PendingNaming` is created.
pub async fn register_capture<S: RecordingStore>(
    store: &S,
    path: &Path,
    recorded_at: DateTime<Utc>,
) -> Result<Recording, StoreError> {
    if let Some(existing) = store.find_by_path(path).await? {
        return Ok(existing);
    }
    store
        .create("", path, recorded_at, TranscriptionStatus::PendingNaming)
        .await
}

/// Give a captured file its user-facing name.
///
/// If a record for the path already exists its id is kept, the name is
/// updated, and unless the current status is one that must survive a
/// rename (completed, or queued/running work) the record is reset to
/// `PendingTranscription` with the transcript cleared. Otherwise a fresh
/// record is created with status `PendingTranscription`.
pub async fn name_recording<S: RecordingStore>(
    store: &S,
    path: &Path,
    name: &str,
    recorded_at: DateTime<Utc>,
) -> Result<Recording, NamingError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NamingError::EmptyName);
    }

    match store.find_by_path(path).await? {
        Some(existing) => {
            let mut updated = existing.clone();
            updated.name = name.to_string();
            if !existing.status.preserved_on_rename() {
                updated.status = TranscriptionStatus::PendingTranscription;
                updated.transcript = None;
            }
            if updated != existing {
                store.replace(&updated).await?;
            }
            Ok(updated)
        }
        None => {
            let created = store
                .create(
                    name,
                    path,
                    recorded_at,
                    TranscriptionStatus::PendingTranscription,
                )
                .await?;
            Ok(created)
        }
    }
}
