//! Recording repository port interface

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::recording::{Recording, RecordingId, TranscriptionStatus};

/// Recording repository errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("No recording found with id {0}")]
    NotFound(RecordingId),

    #[error("Failed to read recording store: {0}")]
    ReadError(String),

    #[error("Failed to parse recording store: {0}")]
    ParseError(String),

    #[error("Failed to write recording store: {0}")]
    WriteError(String),
}

/// Port for durable recording storage with live queries.
///
/// Every committed write is published to the watch channels handed out by
/// `observe` and `observe_all`. Receivers see the latest committed state;
/// a slow receiver may skip intermediate values but never misses the most
/// recent one. Point mutations on an id that does not exist fail with
/// `StoreError::NotFound`.
#[async_trait]
pub trait RecordingStore: Send + Sync {
    /// Create a recording record. The id is assigned here.
    ///
    /// Path uniqueness is the caller's job: check `find_by_path` first
    /// and update the existing record instead of creating a duplicate.
    async fn create(
        &self,
        name: &str,
        file_path: &Path,
        recorded_at: DateTime<Utc>,
        status: TranscriptionStatus,
    ) -> Result<Recording, StoreError>;

    /// Look up a recording by its audio file path
    async fn find_by_path(&self, path: &Path) -> Result<Option<Recording>, StoreError>;

    /// Look up a recording by id
    async fn get(&self, id: RecordingId) -> Result<Option<Recording>, StoreError>;

    /// Observe a single recording. The receiver is seeded with the
    /// current value and sees `None` once the recording is deleted.
    async fn observe(&self, id: RecordingId) -> watch::Receiver<Option<Recording>>;

    /// Observe all recordings, ordered by recording date descending.
    /// The ordering is part of the contract.
    fn observe_all(&self) -> watch::Receiver<Vec<Recording>>;

    /// Update the display name
    async fn update_name(&self, id: RecordingId, name: &str) -> Result<(), StoreError>;

    /// Update the transcription status
    async fn update_status(
        &self,
        id: RecordingId,
        status: TranscriptionStatus,
    ) -> Result<(), StoreError>;

    /// Update the transcript text and status together, as one write
    async fn update_transcript_and_status(
        &self,
        id: RecordingId,
        transcript: &str,
        status: TranscriptionStatus,
    ) -> Result<(), StoreError>;

    /// Replace the whole record for an existing id
    async fn replace(&self, recording: &Recording) -> Result<(), StoreError>;

    /// Delete the record
    async fn delete(&self, id: RecordingId) -> Result<(), StoreError>;
}

/// Sort recordings for listings: newest first, id as a stable tie-break
pub fn listing_order(a: &Recording, b: &Recording) -> std::cmp::Ordering {
    b.recorded_at
        .cmp(&a.recorded_at)
        .then_with(|| a.id.cmp(&b.id))
}
