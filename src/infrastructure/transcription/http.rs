//! HTTP transcription service adapter

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{
    AudioUpload, TranscriptionResponse, TranscriptionService, TranscriptionServiceError,
};

/// Upload endpoint route on the transcription backend
const UPLOAD_ROUTE: &str = "/api/v1/upload_audio";

/// Transcription runs whisper on the server side and can take minutes
/// for a long appointment
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

// Response types for the upload endpoint

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    error: Option<String>,
    transcript: Option<String>,
}

impl UploadResponse {
    /// The backend reports processing results under `message` and
    /// validation failures under `error`
    fn message(&self) -> Option<String> {
        self.message.clone().or_else(|| self.error.clone())
    }
}

/// Transcription service client over HTTP
pub struct HttpTranscriptionService {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpTranscriptionService {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Build the upload URL
    fn upload_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), UPLOAD_ROUTE)
    }

    /// Build the multipart form for one upload
    fn build_form(upload: &AudioUpload<'_>) -> Result<multipart::Form, TranscriptionServiceError> {
        let mut part = multipart::Part::bytes(upload.data.to_vec())
            .file_name(upload.file_name.to_string());
        if let Some(format) = upload.format {
            part = part
                .mime_str(format.mime_type())
                .map_err(|e| TranscriptionServiceError::request("Request Error", e.to_string()))?;
        }

        Ok(multipart::Form::new()
            .part("audioFile", part)
            .text("description", upload.description.to_string()))
    }

    /// Classify a transport failure to a stable kind usable as a status
    /// label
    fn classify(err: reqwest::Error) -> TranscriptionServiceError {
        let kind = if err.is_timeout() {
            "Timeout"
        } else if err.is_connect() {
            "Connection Error"
        } else {
            "Request Error"
        };
        TranscriptionServiceError::request(kind, err.to_string())
    }
}

#[async_trait]
impl TranscriptionService for HttpTranscriptionService {
    async fn transcribe(
        &self,
        upload: AudioUpload<'_>,
    ) -> Result<TranscriptionResponse, TranscriptionServiceError> {
        let url = self.upload_url();
        let form = Self::build_form(&upload)?;

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranscriptionServiceError::Server {
                code: status.as_u16(),
                body,
            });
        }

        let body: UploadResponse = response.json().await.map_err(|e| {
            TranscriptionServiceError::request("Invalid Response", e.to_string())
        })?;

        // A success status carrying a failure body still counts as a
        // failed request.
        if !body.success {
            let detail = body
                .message()
                .unwrap_or_else(|| "Service reported failure".to_string());
            return Err(TranscriptionServiceError::request("Invalid Response", detail));
        }

        Ok(TranscriptionResponse {
            message: body.message(),
            transcript: body.transcript,
        })
    }
}
