//! Recording entity

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::TranscriptionStatus;

/// Unique identifier assigned to a recording when its record is created
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordingId(Uuid);

impl RecordingId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// The persisted record of one appointment recording.
///
/// `transcript` holds the transcription text once the status is Completed;
/// after a failed attempt it holds the failure diagnostic instead, so it is
/// only meaningful as a transcript when the status says so.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub id: RecordingId,
    pub name: String,
    pub file_path: PathBuf,
    pub recorded_at: DateTime<Utc>,
    pub transcript: Option<String>,
    pub status: TranscriptionStatus,
}

impl Recording {
    /// Create a recording with a fresh identifier and no transcript
    pub fn new(
        name: impl Into<String>,
        file_path: impl Into<PathBuf>,
        recorded_at: DateTime<Utc>,
        status: TranscriptionStatus,
    ) -> Self {
        Self {
            id: RecordingId::new(),
            name: name.into(),
            file_path: file_path.into(),
            recorded_at,
            transcript: None,
            status,
        }
    }
}
