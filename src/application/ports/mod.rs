//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod export;
pub mod playback;
pub mod store;
pub mod transcription;

// Re-export common types
pub use config::ConfigStore;
pub use export::{ExportError, TranscriptExporter};
pub use playback::{AudioOutput, PlaybackDriver, PlaybackError, PlaybackHandle, PlaybackSession};
pub use store::{listing_order, RecordingStore, StoreError};
pub use transcription::{
    AudioUpload, TranscriptionResponse, TranscriptionService, TranscriptionServiceError,
};
