//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like the filesystem, the
//! transcription backend and the audio device.

pub mod config;
pub mod export;
pub mod playback;
pub mod store;
pub mod transcription;

// Re-export adapters
pub use config::XdgConfigStore;
pub use export::TextFileExporter;
pub use playback::RodioAudioOutput;
pub use store::{audio_dir, JsonFileStore};
pub use transcription::HttpTranscriptionService;
