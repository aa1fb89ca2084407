//! Transcription service adapters

pub mod http;

pub use http::HttpTranscriptionService;
