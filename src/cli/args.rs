//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// VisitScribe - Medical appointment recording manager
#[derive(Parser, Debug)]
#[command(name = "visit-scribe")]
#[command(version)]
#[command(about = "Manage medical appointment recordings and their transcriptions")]
#[command(long_about = None)]
pub struct Cli {
    /// Transcription service URL (overrides config file)
    #[arg(long, value_name = "URL", global = true)]
    pub service_url: Option<String>,

    /// Data directory for the record store and managed audio files
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register an audio file as a new recording
    Add {
        /// Audio file to register
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Recording name; without one the recording waits for naming
        #[arg(short, long)]
        name: Option<String>,

        /// Register only, do not submit for transcription
        #[arg(long)]
        no_transcribe: bool,

        /// Reference the file where it lies instead of copying it into
        /// the data directory
        #[arg(long)]
        in_place: bool,
    },

    /// List recordings, newest first
    List,

    /// Show one recording in full
    Show {
        /// Recording id (a unique prefix is enough)
        id: String,
    },

    /// Submit a recording for transcription
    #[command(visible_alias = "retry")]
    Transcribe {
        /// Recording id (a unique prefix is enough)
        id: String,
    },

    /// Rename a recording
    Rename {
        /// Recording id (a unique prefix is enough)
        id: String,
        /// New name
        name: String,
    },

    /// Play a recording's audio (Ctrl-C stops)
    Play {
        /// Recording id (a unique prefix is enough)
        id: String,
    },

    /// Export a completed transcript to a text file
    Export {
        /// Recording id (a unique prefix is enough)
        id: String,

        /// Directory to write into (defaults to the configured
        /// export_dir, then the working directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Delete a recording and its audio file
    Delete {
        /// Recording id (a unique prefix is enough)
        id: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List or remove audio files no recording references
    Prune {
        /// Remove the orphaned files instead of only listing them
        #[arg(long)]
        delete: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["service_url", "data_dir", "export_dir"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
