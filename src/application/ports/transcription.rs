//! Transcription service port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::AudioFormat;

/// One audio upload, ready to send as a single request
#[derive(Debug, Clone, Copy)]
pub struct AudioUpload<'a> {
    /// Raw audio bytes
    pub data: &'a [u8],
    /// File name presented to the service
    pub file_name: &'a str,
    /// Container format, when the extension is a recognized one
    pub format: Option<AudioFormat>,
    /// Short human-readable description of the recording
    pub description: &'a str,
}

/// Successful service response. `Ok` from the port always means the
/// service accepted and processed the upload; a missing transcript on a
/// successful response is possible and left to the caller to interpret.
#[derive(Debug, Clone, Default)]
pub struct TranscriptionResponse {
    pub message: Option<String>,
    pub transcript: Option<String>,
}

/// Transcription service errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionServiceError {
    /// The service rejected or failed the request with an HTTP status
    #[error("Server error {code}: {body}")]
    Server { code: u16, body: String },

    /// The request never produced a usable response. `kind` is a short
    /// stable label ("Timeout", "Connection Error", ...) suitable for a
    /// status string; `detail` carries the underlying error text.
    #[error("{kind}: {detail}")]
    Request { kind: String, detail: String },
}

impl TranscriptionServiceError {
    pub fn request(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Request {
            kind: kind.into(),
            detail: detail.into(),
        }
    }
}

/// Port for the transcription service
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Send one audio upload and await the transcription outcome.
    ///
    /// # Arguments
    /// * `upload` - The audio bytes plus naming and description metadata
    ///
    /// # Returns
    /// The service's response, or a classified error
    async fn transcribe(
        &self,
        upload: AudioUpload<'_>,
    ) -> Result<TranscriptionResponse, TranscriptionServiceError>;
}
