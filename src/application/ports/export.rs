//! Transcript export port interface

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Export errors
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    #[error("Failed to create export directory: {0}")]
    DirectoryFailed(String),

    #[error("Failed to write export file: {0}")]
    WriteFailed(String),
}

/// Port for producing a shareable document from a transcript
#[async_trait]
pub trait TranscriptExporter: Send + Sync {
    /// Write the transcript under the recording's name.
    ///
    /// # Returns
    /// The path of the document that was produced
    async fn export(&self, name: &str, transcript: &str) -> Result<PathBuf, ExportError>;
}
