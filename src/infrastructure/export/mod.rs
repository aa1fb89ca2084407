//! Transcript export adapters

pub mod text_file;

pub use text_file::TextFileExporter;
