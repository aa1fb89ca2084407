//! Recording store adapters

pub mod json_file;

pub use json_file::{audio_dir, JsonFileStore};
