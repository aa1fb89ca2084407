//! CLI presenter for output formatting

use chrono::Local;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::recording::{Recording, RecordingId, TranscriptionStatus};

/// Column width that fits the longest common status label
const STATUS_WIDTH: usize = 26;

/// First segment of the hyphenated id, enough to disambiguate in practice
pub fn short_id(id: RecordingId) -> String {
    id.to_string().chars().take(8).collect()
}

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Get a clonable handle on the running spinner, for callbacks
    pub fn spinner(&self) -> Option<ProgressBar> {
        self.spinner.clone()
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout (listings, transcripts, config values)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list and show)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Status label colored by its class
    pub fn format_status(&self, status: &TranscriptionStatus) -> String {
        self.paint_status(status, status.to_string())
    }

    /// One listing line: short id, date, status, name
    pub fn recording_row(&self, recording: &Recording) -> String {
        let padded = format!("{:<width$}", recording.status.to_string(), width = STATUS_WIDTH);
        format!(
            "{}  {}  {}  {}",
            short_id(recording.id).dimmed(),
            recording
                .recorded_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M"),
            self.paint_status(&recording.status, padded),
            self.display_name(recording),
        )
    }

    /// Recording name, with a placeholder for not-yet-named recordings
    pub fn display_name(&self, recording: &Recording) -> String {
        if recording.name.is_empty() {
            "(unnamed)".italic().to_string()
        } else {
            recording.name.clone()
        }
    }

    fn paint_status(&self, status: &TranscriptionStatus, label: String) -> String {
        if *status == TranscriptionStatus::Completed {
            label.green().to_string()
        } else if status.is_failed() {
            label.red().to_string()
        } else if status.is_in_flight() {
            label.cyan().to_string()
        } else {
            label.yellow().to_string()
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
