//! Text file transcript exporter

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{ExportError, TranscriptExporter};

/// File stem used when a recording name sanitizes down to nothing
const FALLBACK_STEM: &str = "transcript";

/// Writes transcripts as plain text files named after the recording
pub struct TextFileExporter {
    export_dir: PathBuf,
}

impl TextFileExporter {
    /// Create an exporter targeting `export_dir`
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    /// Turn a recording name into a safe file stem. Recording names are
    /// free text and may contain anything a user can type.
    fn sanitize(name: &str) -> String {
        let stem: String = name
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' => '-',
                c if c.is_control() => ' ',
                c => c,
            })
            .collect();

        let stem = stem.trim();
        if stem.is_empty() {
            FALLBACK_STEM.to_string()
        } else {
            stem.to_string()
        }
    }
}

#[async_trait]
impl TranscriptExporter for TextFileExporter {
    async fn export(&self, name: &str, transcript: &str) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.export_dir)
            .await
            .map_err(|e| ExportError::DirectoryFailed(e.to_string()))?;

        let stem = Self::sanitize(name);
        let mut path = self.export_dir.join(format!("{stem}.txt"));
        let mut counter = 1;
        while path.exists() {
            path = self.export_dir.join(format!("{stem}-{counter}.txt"));
            counter += 1;
        }

        fs::write(&path, transcript)
            .await
            .map_err(|e| ExportError::WriteFailed(e.to_string()))?;

        Ok(path)
    }
}
