//! Main app runner: resolves configuration, opens the store, and
//! dispatches one command per invocation

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use tokio::fs;

use crate::application::ports::{ConfigStore, RecordingStore};
use crate::application::{
    export_transcript, name_recording, register_capture, DeletionCoordinator, DisplayUpdate,
    FocusTracker, NamingError, PlaybackController, TranscriptionOrchestrator,
};
use crate::domain::config::AppConfig;
use crate::domain::recording::{AudioFormat, Recording, RecordingId, TranscriptionStatus, ALL_FORMATS};
use crate::infrastructure::{
    audio_dir, HttpTranscriptionService, JsonFileStore, RodioAudioOutput, TextFileExporter,
    XdgConfigStore,
};

use super::args::{Cli, Commands};
use super::config_cmd::handle_config_command;
use super::presenter::{short_id, Presenter};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Run the parsed command line
pub async fn run(cli: Cli) -> ExitCode {
    let mut presenter = Presenter::new();

    // Config management works without a data dir or store
    let command = match cli.command {
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            return match handle_config_command(action, &store, &presenter).await {
                Ok(()) => ExitCode::from(EXIT_SUCCESS),
                Err(e) => {
                    presenter.error(&e.to_string());
                    ExitCode::from(EXIT_USAGE_ERROR)
                }
            };
        }
        command => command,
    };

    let cli_config = AppConfig {
        service_url: cli.service_url,
        data_dir: cli.data_dir,
        export_dir: None,
    };
    let config = load_merged_config(cli_config).await;
    let data_dir = resolve_data_dir(&config);

    let store = match JsonFileStore::open(&data_dir).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            presenter.error(&format!(
                "Cannot open recording store in {}: {}",
                data_dir.display(),
                e
            ));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match command {
        Commands::Add {
            file,
            name,
            no_transcribe,
            in_place,
        } => {
            handle_add(
                &store,
                &config,
                &data_dir,
                &mut presenter,
                file,
                name,
                no_transcribe,
                in_place,
            )
            .await
        }
        Commands::List => handle_list(&store, &presenter),
        Commands::Show { id } => handle_show(&store, &presenter, &id).await,
        Commands::Transcribe { id } => {
            handle_transcribe(&store, &config, &mut presenter, &id).await
        }
        Commands::Rename { id, name } => handle_rename(&store, &presenter, &id, &name).await,
        Commands::Play { id } => handle_play(&store, &presenter, &id).await,
        Commands::Export { id, output } => {
            handle_export(&store, &config, &presenter, &id, output).await
        }
        Commands::Delete { id, yes } => handle_delete(&store, &presenter, &id, yes).await,
        Commands::Prune { delete } => handle_prune(&store, &data_dir, &presenter, delete).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Build env config
    let env_config = AppConfig {
        service_url: env::var("VISIT_SCRIBE_URL").ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Where record and audio files live when no data_dir is configured
fn resolve_data_dir(config: &AppConfig) -> PathBuf {
    config.data_dir().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("visit-scribe")
    })
}

#[allow(clippy::too_many_arguments)]
async fn handle_add(
    store: &Arc<JsonFileStore>,
    config: &AppConfig,
    data_dir: &Path,
    presenter: &mut Presenter,
    file: PathBuf,
    name: Option<String>,
    no_transcribe: bool,
    in_place: bool,
) -> ExitCode {
    let source = match fs::canonicalize(&file).await {
        Ok(path) => path,
        Err(_) => {
            presenter.error(&format!("Audio file not found: {}", file.display()));
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    if AudioFormat::from_path(&source).is_none() {
        let supported: Vec<&str> = ALL_FORMATS.iter().map(|f| f.extension()).collect();
        presenter.error(&format!(
            "Unsupported audio format. Supported: {}",
            supported.join(", ")
        ));
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    let recorded_at = recorded_at_of(&source).await;
    let target = if in_place {
        source.clone()
    } else {
        let dir = audio_dir(data_dir);
        if let Err(e) = fs::create_dir_all(&dir).await {
            presenter.error(&format!("Cannot create {}: {}", dir.display(), e));
            return ExitCode::from(EXIT_ERROR);
        }
        // canonicalize() on a regular file always yields a file name
        let file_name = match source.file_name() {
            Some(file_name) => file_name,
            None => {
                presenter.error(&format!("Not an audio file: {}", source.display()));
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        };
        let target = dir.join(file_name);
        if target != source {
            if let Err(e) = fs::copy(&source, &target).await {
                presenter.error(&format!("Cannot copy audio into {}: {}", dir.display(), e));
                return ExitCode::from(EXIT_ERROR);
            }
        }
        target
    };

    let recording = match name.as_deref() {
        Some(given) => match name_recording(store.as_ref(), &target, given, recorded_at).await {
            Ok(recording) => recording,
            Err(NamingError::EmptyName) => {
                presenter.error("Recording name must not be empty");
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
            Err(NamingError::Store(e)) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        },
        None => match register_capture(store.as_ref(), &target, recorded_at).await {
            Ok(recording) => recording,
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        },
    };

    presenter.success(&format!(
        "Registered {} ({})",
        presenter.display_name(&recording),
        short_id(recording.id)
    ));

    match recording.status {
        TranscriptionStatus::PendingNaming => {
            presenter.info(&format!(
                "Name it to queue transcription: visit-scribe rename {} <name>",
                short_id(recording.id)
            ));
            ExitCode::from(EXIT_SUCCESS)
        }
        TranscriptionStatus::PendingTranscription if !no_transcribe => {
            transcribe_and_report(store, config, presenter, &recording).await
        }
        TranscriptionStatus::Completed => {
            presenter.info("Already transcribed");
            ExitCode::from(EXIT_SUCCESS)
        }
        _ => ExitCode::from(EXIT_SUCCESS),
    }
}

fn handle_list(store: &Arc<JsonFileStore>, presenter: &Presenter) -> ExitCode {
    let rx = store.observe_all();
    let recordings = rx.borrow().clone();
    if recordings.is_empty() {
        presenter.info("No recordings yet. Add one with: visit-scribe add <file>");
        return ExitCode::from(EXIT_SUCCESS);
    }
    for recording in &recordings {
        presenter.output(&presenter.recording_row(recording));
    }
    ExitCode::from(EXIT_SUCCESS)
}

async fn handle_show(store: &Arc<JsonFileStore>, presenter: &Presenter, id: &str) -> ExitCode {
    let recording = match resolve_recording(store.as_ref(), id).await {
        Ok(recording) => recording,
        Err(message) => {
            presenter.error(&message);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.key_value("Name", &presenter.display_name(&recording));
    presenter.key_value("Id", &recording.id.to_string());
    presenter.key_value(
        "Recorded",
        &recording
            .recorded_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
    );
    presenter.key_value("File", &recording.file_path.display().to_string());
    presenter.key_value("Status", &presenter.format_status(&recording.status));

    // After a failed attempt this is the failure diagnostic, not a transcript
    if let Some(text) = &recording.transcript {
        presenter.output("");
        presenter.output(text);
    }
    ExitCode::from(EXIT_SUCCESS)
}

async fn handle_transcribe(
    store: &Arc<JsonFileStore>,
    config: &AppConfig,
    presenter: &mut Presenter,
    id: &str,
) -> ExitCode {
    let recording = match resolve_recording(store.as_ref(), id).await {
        Ok(recording) => recording,
        Err(message) => {
            presenter.error(&message);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if recording.status == TranscriptionStatus::PendingNaming {
        presenter.error(&format!(
            "Recording has no name yet. Name it first: visit-scribe rename {} <name>",
            short_id(recording.id)
        ));
        return ExitCode::from(EXIT_USAGE_ERROR);
    }
    transcribe_and_report(store, config, presenter, &recording).await
}

/// Submit one recording for transcription and report the outcome.
///
/// The recording is focused for the whole run, so status changes land
/// on the spinner as they happen.
async fn transcribe_and_report(
    store: &Arc<JsonFileStore>,
    config: &AppConfig,
    presenter: &mut Presenter,
    recording: &Recording,
) -> ExitCode {
    let service = HttpTranscriptionService::new(config.service_url_or_default());
    let focus = FocusTracker::new();
    focus.focus(recording.id).await;
    let orchestrator = TranscriptionOrchestrator::new(Arc::clone(store), service, focus.clone());

    presenter.start_spinner(&format!("Transcribing '{}'...", recording.name));
    let on_display: Option<DisplayUpdate> = presenter.spinner().map(|bar| {
        let update: DisplayUpdate = Arc::new(move |text: &str| {
            bar.set_message(summarize(text));
        });
        update
    });

    let status = match orchestrator
        .submit(recording.id, &recording.file_path, &recording.name, on_display)
        .await
    {
        Ok(status) => status,
        Err(e) => {
            presenter.stop_spinner();
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // The stored record carries the transcript or the failure diagnostic
    let detail = store
        .get(recording.id)
        .await
        .ok()
        .flatten()
        .and_then(|r| r.transcript)
        .unwrap_or_default();

    if status == TranscriptionStatus::Completed {
        presenter.spinner_success("Transcription complete");
        presenter.output(&detail);
        ExitCode::from(EXIT_SUCCESS)
    } else {
        let label = presenter.format_status(&status);
        presenter.spinner_fail(&label);
        if !detail.is_empty() {
            presenter.error(&detail);
        }
        ExitCode::from(EXIT_ERROR)
    }
}

async fn handle_rename(
    store: &Arc<JsonFileStore>,
    presenter: &Presenter,
    id: &str,
    name: &str,
) -> ExitCode {
    let recording = match resolve_recording(store.as_ref(), id).await {
        Ok(recording) => recording,
        Err(message) => {
            presenter.error(&message);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let before = recording.status.clone();
    match name_recording(
        store.as_ref(),
        &recording.file_path,
        name,
        recording.recorded_at,
    )
    .await
    {
        Ok(updated) => {
            presenter.success(&format!("Renamed to '{}'", updated.name));
            if updated.status != before {
                presenter.info(&format!("Status reset to {}", updated.status));
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(NamingError::EmptyName) => {
            presenter.error("Recording name must not be empty");
            ExitCode::from(EXIT_USAGE_ERROR)
        }
        Err(NamingError::Store(e)) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn handle_play(store: &Arc<JsonFileStore>, presenter: &Presenter, id: &str) -> ExitCode {
    let recording = match resolve_recording(store.as_ref(), id).await {
        Ok(recording) => recording,
        Err(message) => {
            presenter.error(&message);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let controller = PlaybackController::new(RodioAudioOutput::new());
    match controller.toggle(&recording.file_path).await {
        Ok(true) => {}
        // A fresh controller has nothing to stop
        Ok(false) => return ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    }

    presenter.info(&format!(
        "Playing '{}' (Ctrl-C to stop)",
        presenter.display_name(&recording)
    ));
    let mut playback = controller.observe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                controller.stop().await;
                break;
            }
            changed = playback.changed() => {
                if changed.is_err() || !playback.borrow_and_update().is_playing {
                    break;
                }
            }
        }
    }
    ExitCode::from(EXIT_SUCCESS)
}

async fn handle_export(
    store: &Arc<JsonFileStore>,
    config: &AppConfig,
    presenter: &Presenter,
    id: &str,
    output: Option<PathBuf>,
) -> ExitCode {
    let recording = match resolve_recording(store.as_ref(), id).await {
        Ok(recording) => recording,
        Err(message) => {
            presenter.error(&message);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let export_dir = output
        .or_else(|| config.export_dir())
        .unwrap_or_else(|| PathBuf::from("."));
    let exporter = TextFileExporter::new(export_dir);
    match export_transcript(store.as_ref(), &exporter, recording.id).await {
        Ok(path) => {
            presenter.success(&format!("Exported to {}", path.display()));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn handle_delete(
    store: &Arc<JsonFileStore>,
    presenter: &Presenter,
    id: &str,
    yes: bool,
) -> ExitCode {
    let recording = match resolve_recording(store.as_ref(), id).await {
        Ok(recording) => recording,
        Err(message) => {
            presenter.error(&message);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if !yes
        && !confirm(&format!(
            "Delete '{}' and its audio file?",
            presenter.display_name(&recording)
        ))
    {
        presenter.info("Aborted");
        return ExitCode::from(EXIT_SUCCESS);
    }

    let coordinator = DeletionCoordinator::new(Arc::clone(store));
    let outcome = coordinator.delete(&recording).await;
    if outcome.succeeded() {
        presenter.success(&format!("Deleted '{}'", presenter.display_name(&recording)));
        if !outcome.file_deleted {
            presenter.warn(&format!(
                "Audio file could not be removed: {}",
                recording.file_path.display()
            ));
        }
        ExitCode::from(EXIT_SUCCESS)
    } else {
        presenter.error("Failed to delete the recording");
        ExitCode::from(EXIT_ERROR)
    }
}

async fn handle_prune(
    store: &Arc<JsonFileStore>,
    data_dir: &Path,
    presenter: &Presenter,
    delete: bool,
) -> ExitCode {
    let coordinator = DeletionCoordinator::new(Arc::clone(store));
    let dir = audio_dir(data_dir);
    let orphans = match coordinator.scan_orphans(&dir).await {
        Ok(orphans) => orphans,
        Err(e) => {
            presenter.error(&format!("Cannot scan {}: {}", dir.display(), e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if orphans.is_empty() {
        presenter.info("No orphaned audio files");
        return ExitCode::from(EXIT_SUCCESS);
    }

    if !delete {
        for path in &orphans {
            presenter.output(&path.display().to_string());
        }
        presenter.info(&format!(
            "{} orphaned file(s). Remove with: visit-scribe prune --delete",
            orphans.len()
        ));
        return ExitCode::from(EXIT_SUCCESS);
    }

    let mut removed = 0;
    for path in &orphans {
        match fs::remove_file(path).await {
            Ok(()) => removed += 1,
            Err(e) => presenter.warn(&format!("Could not remove {}: {}", path.display(), e)),
        }
    }
    presenter.success(&format!("Removed {} orphaned file(s)", removed));
    ExitCode::from(EXIT_SUCCESS)
}

/// Find a recording by full id or by unique id prefix
async fn resolve_recording<S: RecordingStore>(store: &S, input: &str) -> Result<Recording, String> {
    if let Ok(id) = input.parse::<RecordingId>() {
        return match store.get(id).await {
            Ok(Some(recording)) => Ok(recording),
            Ok(None) => Err(format!("No recording found with id {}", input)),
            Err(e) => Err(e.to_string()),
        };
    }

    let needle = input.to_lowercase();
    if needle.is_empty() {
        return Err("Empty recording id".to_string());
    }
    let rx = store.observe_all();
    let all = rx.borrow().clone();
    let mut matches = all.iter().filter(|r| r.id.to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(recording), None) => Ok(recording.clone()),
        (Some(_), Some(_)) => Err(format!(
            "Id prefix '{}' is ambiguous; use more characters",
            input
        )),
        (None, _) => Err(format!("No recording matches id prefix '{}'", input)),
    }
}

/// Best guess at when the audio was captured: the file's mtime, else now
async fn recorded_at_of(path: &Path) -> DateTime<Utc> {
    match fs::metadata(path).await.and_then(|m| m.modified()) {
        Ok(time) => time.into(),
        Err(_) => Utc::now(),
    }
}

/// First line of the text, shortened to fit on a spinner
fn summarize(text: &str) -> String {
    const MAX_CHARS: usize = 80;
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() > MAX_CHARS {
        let mut short: String = line.chars().take(MAX_CHARS - 1).collect();
        short.push('…');
        short
    } else {
        line.to_string()
    }
}

fn confirm(prompt: &str) -> bool {
    eprint!("{} [y/N] ", prompt);
    let _ = std::io::stderr().flush();
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_keeps_short_lines() {
        assert_eq!(
            summarize("Server error 500: boom"),
            "Server error 500: boom"
        );
    }

    #[test]
    fn summarize_takes_the_first_line() {
        assert_eq!(summarize("line one\nline two"), "line one");
    }

    #[test]
    fn summarize_shortens_long_lines() {
        let long = "x".repeat(200);
        let short = summarize(&long);
        assert!(short.chars().count() <= 80);
        assert!(short.ends_with('…'));
    }

    #[test]
    fn data_dir_prefers_the_configured_value() {
        let config = AppConfig {
            service_url: None,
            data_dir: Some("/srv/visits".to_string()),
            export_dir: None,
        };
        assert_eq!(resolve_data_dir(&config), PathBuf::from("/srv/visits"));
    }

    #[test]
    fn data_dir_falls_back_to_the_platform_dir() {
        let config = AppConfig::empty();
        let dir = resolve_data_dir(&config);
        assert!(dir.ends_with("visit-scribe"));
    }
}
