//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Transcription service URL used when none is configured
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub service_url: Option<String>,
    pub data_dir: Option<String>,
    pub export_dir: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            service_url: Some(DEFAULT_SERVICE_URL.to_string()),
            data_dir: None,
            export_dir: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            service_url: other.service_url.or(self.service_url),
            data_dir: other.data_dir.or(self.data_dir),
            export_dir: other.export_dir.or(self.export_dir),
        }
    }

    /// Get the service URL, or the built-in default if not set
    pub fn service_url_or_default(&self) -> &str {
        self.service_url.as_deref().unwrap_or(DEFAULT_SERVICE_URL)
    }

    /// Get the data directory as a path, if configured
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(PathBuf::from)
    }

    /// Get the export directory as a path, if configured
    pub fn export_dir(&self) -> Option<PathBuf> {
        self.export_dir.as_ref().map(PathBuf::from)
    }
}
