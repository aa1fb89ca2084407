//! Transcription orchestration use case
//!
//! Drives one recording through upload and transcription to a terminal
//! status. Every outcome, success or failure, is persisted to the store;
//! a transcription failure is never raised past this boundary. Callers
//! observe it through the recording's status and transcript, which holds
//! the diagnostic message for failed attempts.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::recording::{AudioFormat, FailureReason, RecordingId, TranscriptionStatus};

use super::focus::{DisplayUpdate, FocusTracker};
use super::ports::{
    AudioUpload, RecordingStore, StoreError, TranscriptionService, TranscriptionServiceError,
};

/// Transcript text persisted when the service reports success without any
/// transcript payload
pub const EMPTY_TRANSCRIPT_PLACEHOLDER: &str = "No transcript content received.";

/// Drives recordings through the transcription lifecycle
pub struct TranscriptionOrchestrator<S, T>
where
    S: RecordingStore,
    T: TranscriptionService,
{
    store: Arc<S>,
    service: T,
    focus: FocusTracker,
}

impl<S, T> TranscriptionOrchestrator<S, T>
where
    S: RecordingStore,
    T: TranscriptionService,
{
    /// Create a new orchestrator
    pub fn new(store: Arc<S>, service: T, focus: FocusTracker) -> Self {
        Self {
            store,
            service,
            focus,
        }
    }

    /// Submit one recording for transcription and await its outcome.
    ///
    /// The in-flight status (Transcribing, or Retrying when the previous
    /// attempt failed) is written before any I/O, and the terminal write
    /// always happens after it, so observers never see a terminal state
    /// silently regress. Display updates go through `on_display` only
    /// while `id` is still the focused recording; persisted writes are
    /// never gated.
    ///
    /// There is no per-id lock: two concurrent submits for the same id
    /// race and the last store write wins.
    ///
    /// # Returns
    /// The terminal status that was persisted. Only store failures (or an
    /// unknown id) surface as errors.
    pub async fn submit(
        &self,
        id: RecordingId,
        file_path: &Path,
        name: &str,
        on_display: Option<DisplayUpdate>,
    ) -> Result<TranscriptionStatus, StoreError> {
        let prior = self
            .store
            .get(id)
            .await?
            .ok_or(StoreError::NotFound(id))?
            .status;

        let in_flight = prior.next_attempt();
        self.store.update_status(id, in_flight.clone()).await?;
        info!(%id, status = %in_flight, "transcription attempt started");
        self.notify(id, &on_display, &in_flight.to_string()).await;

        let exists = matches!(tokio::fs::try_exists(file_path).await, Ok(true));
        if !exists {
            let diagnostic = format!("Audio file is missing: {}", file_path.display());
            return self
                .conclude(
                    id,
                    &on_display,
                    diagnostic,
                    TranscriptionStatus::Failed(FailureReason::FileMissing),
                )
                .await;
        }

        let data = match tokio::fs::read(file_path).await {
            Ok(data) => data,
            Err(err) => {
                let diagnostic = format!("Read Error: {}", err);
                return self
                    .conclude(
                        id,
                        &on_display,
                        diagnostic,
                        TranscriptionStatus::Failed(FailureReason::RequestError(
                            "Read Error".to_string(),
                        )),
                    )
                    .await;
            }
        };

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("recording");
        let description = format!("Medical appointment recording: {}", name);
        let upload = AudioUpload {
            data: &data,
            file_name,
            format: AudioFormat::from_path(file_path),
            description: &description,
        };

        let (outcome, status) = match self.service.transcribe(upload).await {
            Ok(response) => {
                if let Some(message) = &response.message {
                    debug!(%id, message, "service message");
                }
                match response.transcript.filter(|t| !t.trim().is_empty()) {
                    Some(transcript) => (transcript, TranscriptionStatus::Completed),
                    None => (
                        EMPTY_TRANSCRIPT_PLACEHOLDER.to_string(),
                        TranscriptionStatus::Completed,
                    ),
                }
            }
            Err(TranscriptionServiceError::Server { code, body }) => (
                format!("Server error {}: {}", code, body),
                TranscriptionStatus::Failed(FailureReason::ServerError(code)),
            ),
            Err(TranscriptionServiceError::Request { kind, detail }) => (
                format!("{}: {}", kind, detail),
                TranscriptionStatus::Failed(FailureReason::RequestError(kind)),
            ),
        };

        self.conclude(id, &on_display, outcome, status).await
    }

    /// Persist the terminal outcome, then emit the gated display update
    async fn conclude(
        &self,
        id: RecordingId,
        on_display: &Option<DisplayUpdate>,
        outcome: String,
        status: TranscriptionStatus,
    ) -> Result<TranscriptionStatus, StoreError> {
        self.store
            .update_transcript_and_status(id, &outcome, status.clone())
            .await?;
        info!(%id, status = %status, "transcription attempt finished");
        self.notify(id, on_display, &outcome).await;
        Ok(status)
    }

    /// Invoke the display callback only while `id` is still on display
    async fn notify(&self, id: RecordingId, on_display: &Option<DisplayUpdate>, text: &str) {
        if let Some(callback) = on_display {
            if self.focus.is_current(id).await {
                callback(text);
            } else {
                debug!(%id, "display update suppressed, focus moved away");
            }
        }
    }
}
