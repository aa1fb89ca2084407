//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod deletion;
pub mod export;
pub mod focus;
pub mod naming;
pub mod playback;
pub mod ports;
pub mod transcribe;

// Re-export use cases
pub use deletion::{DeletionCoordinator, DeletionOutcome};
pub use export::{export_transcript, ExportTranscriptError};
pub use focus::{DisplayUpdate, FocusTracker};
pub use naming::{name_recording, register_capture, NamingError};
pub use playback::{PlaybackController, PlaybackState};
pub use transcribe::{TranscriptionOrchestrator, EMPTY_TRANSCRIPT_PLACEHOLDER};
