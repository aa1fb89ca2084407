//! Transcript export use case
//!
//! Only recordings with status `Completed` can be exported. For every
//! other status the transcript field holds diagnostic text, not a
//! transcript, and handing that to the exporter would write a failure
//! message to a file named like a medical document.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::recording::{RecordingId, TranscriptionStatus};

use super::ports::{ExportError, RecordingStore, StoreError, TranscriptExporter};

/// Errors from transcript export
#[derive(Debug, Error)]
pub enum ExportTranscriptError {
    #[error("No recording found with id {0}")]
    NotFound(RecordingId),

    #[error("Recording has no completed transcript (status: {0})")]
    NotCompleted(TranscriptionStatus),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Export the transcript of a completed recording.
///
/// # Returns
/// The path of the written file
pub async fn export_transcript<S, E>(
    store: &S,
    exporter: &E,
    id: RecordingId,
) -> Result<PathBuf, ExportTranscriptError>
where
    S: RecordingStore,
    E: TranscriptExporter,
{
    let recording = store
        .get(id)
        .await?
        .ok_or(ExportTranscriptError::NotFound(id))?;

    if recording.status != TranscriptionStatus::Completed {
        return Err(ExportTranscriptError::NotCompleted(recording.status));
    }

    let transcript = recording.transcript.as_deref().unwrap_or("");
    let path = exporter.export(&recording.name, transcript).await?;
    Ok(path)
}
