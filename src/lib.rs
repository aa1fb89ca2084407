//! VisitScribe - medical appointment recording manager
//!
//! This crate keeps a local library of appointment recordings, sends their
//! audio to a transcription service, and manages the resulting transcripts
//! through their whole lifecycle.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Recording entity, status lifecycle, configuration, errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (JSON store, HTTP service, rodio, etc.)
//! - **CLI**: Command-line interface, argument parsing, and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
