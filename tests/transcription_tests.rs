//! Transcription integration tests
//!
//! Run the real store, orchestrator, and HTTP adapter together against a
//! local mock of the transcription service. No external network access.

use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use visit_scribe::application::ports::RecordingStore;
use visit_scribe::application::{
    name_recording, FocusTracker, TranscriptionOrchestrator, EMPTY_TRANSCRIPT_PLACEHOLDER,
};
use visit_scribe::domain::recording::{FailureReason, TranscriptionStatus};
use visit_scribe::infrastructure::{HttpTranscriptionService, JsonFileStore};

const UPLOAD_PATH: &str = "/api/v1/upload_audio";

async fn open_store(dir: &TempDir) -> Arc<JsonFileStore> {
    Arc::new(JsonFileStore::open(dir.path()).await.unwrap())
}

fn write_audio(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"fake audio bytes").unwrap();
    path
}

fn success_body(transcript: &str) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "message": "File transcribed successfully.",
        "transcript": transcript,
    })
}

fn orchestrator(
    store: &Arc<JsonFileStore>,
    server: &MockServer,
) -> TranscriptionOrchestrator<JsonFileStore, HttpTranscriptionService> {
    TranscriptionOrchestrator::new(
        Arc::clone(store),
        HttpTranscriptionService::new(server.uri()),
        FocusTracker::new(),
    )
}

#[tokio::test]
async fn completed_transcription_lands_in_the_store() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(body_string_contains("audioFile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body("[00:00:01] SPEAKER_00: Hello doctor.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = open_store(&dir).await;
    let audio = write_audio(&dir, "visit1.mp4");
    let recording = name_recording(store.as_ref(), &audio, "Visit 1", chrono::Utc::now())
        .await
        .unwrap();

    let status = orchestrator(&store, &server)
        .submit(recording.id, &audio, "Visit 1", None)
        .await
        .unwrap();

    assert_eq!(status, TranscriptionStatus::Completed);
    let stored = store.get(recording.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TranscriptionStatus::Completed);
    assert_eq!(
        stored.transcript.as_deref(),
        Some("[00:00:01] SPEAKER_00: Hello doctor.")
    );

    // The outcome survives a process restart
    drop(store);
    let reopened = open_store(&dir).await;
    let back = reopened.get(recording.id).await.unwrap().unwrap();
    assert_eq!(back.status, TranscriptionStatus::Completed);
    assert_eq!(
        back.transcript.as_deref(),
        Some("[00:00:01] SPEAKER_00: Hello doctor.")
    );
}

#[tokio::test]
async fn server_failure_is_recorded_with_code_and_body() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("whisper backend unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let store = open_store(&dir).await;
    let audio = write_audio(&dir, "visit2.mp4");
    let recording = name_recording(store.as_ref(), &audio, "Visit 2", chrono::Utc::now())
        .await
        .unwrap();

    let status = orchestrator(&store, &server)
        .submit(recording.id, &audio, "Visit 2", None)
        .await
        .unwrap();

    assert_eq!(status.to_string(), "Failed: Server Error 500");
    let stored = store.get(recording.id).await.unwrap().unwrap();
    assert_eq!(
        stored.status,
        TranscriptionStatus::Failed(FailureReason::ServerError(500))
    );
    let diagnostic = stored.transcript.unwrap();
    assert!(diagnostic.contains("Server error 500"));
    assert!(diagnostic.contains("whisper backend unavailable"));
}

#[tokio::test]
async fn missing_audio_never_reaches_the_service() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let store = open_store(&dir).await;
    let audio = dir.path().join("gone.mp4");
    let recording = name_recording(store.as_ref(), &audio, "Visit 3", chrono::Utc::now())
        .await
        .unwrap();

    let status = orchestrator(&store, &server)
        .submit(recording.id, &audio, "Visit 3", None)
        .await
        .unwrap();

    assert_eq!(
        status,
        TranscriptionStatus::Failed(FailureReason::FileMissing)
    );
    let stored = store.get(recording.id).await.unwrap().unwrap();
    assert!(stored.transcript.unwrap().contains("gone.mp4"));
}

#[tokio::test]
async fn empty_transcript_completes_with_a_placeholder() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "File transcribed successfully.",
            "transcript": "",
        })))
        .mount(&server)
        .await;

    let store = open_store(&dir).await;
    let audio = write_audio(&dir, "visit4.mp4");
    let recording = name_recording(store.as_ref(), &audio, "Visit 4", chrono::Utc::now())
        .await
        .unwrap();

    let status = orchestrator(&store, &server)
        .submit(recording.id, &audio, "Visit 4", None)
        .await
        .unwrap();

    assert_eq!(status, TranscriptionStatus::Completed);
    let stored = store.get(recording.id).await.unwrap().unwrap();
    assert_eq!(
        stored.transcript.as_deref(),
        Some(EMPTY_TRANSCRIPT_PLACEHOLDER)
    );
}

#[tokio::test]
async fn retry_after_a_server_failure_can_succeed() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    // First attempt hits the failing mock, the retry falls through to success
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("warming up"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success_body("Second attempt text")),
        )
        .mount(&server)
        .await;

    let store = open_store(&dir).await;
    let audio = write_audio(&dir, "visit5.mp4");
    let recording = name_recording(store.as_ref(), &audio, "Visit 5", chrono::Utc::now())
        .await
        .unwrap();
    let orchestrator = orchestrator(&store, &server);

    let first = orchestrator
        .submit(recording.id, &audio, "Visit 5", None)
        .await
        .unwrap();
    assert_eq!(
        first,
        TranscriptionStatus::Failed(FailureReason::ServerError(503))
    );

    let second = orchestrator
        .submit(recording.id, &audio, "Visit 5", None)
        .await
        .unwrap();
    assert_eq!(second, TranscriptionStatus::Completed);

    let stored = store.get(recording.id).await.unwrap().unwrap();
    assert_eq!(stored.transcript.as_deref(), Some("Second attempt text"));
}

/// Full binary run against the mock service: add, transcribe, export.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn binary_transcribes_and_exports_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(body_string_contains("audioFile"))
        .and(body_string_contains("Medical appointment recording"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success_body("Patient reports improvement.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let data_dir = home.path().join("data").to_string_lossy().to_string();
    let audio = home.path().join("visit1.mp4");
    std::fs::write(&audio, b"fake mp4 bytes").unwrap();

    let url = server.uri();
    let home_path = home.path().to_path_buf();
    let audio_arg = audio.to_string_lossy().to_string();

    // The subprocess blocks, so it runs off the async runtime
    let add_dir = data_dir.clone();
    let add_home = home_path.clone();
    let output = tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_visit-scribe"))
            .env("HOME", &add_home)
            .env("XDG_CONFIG_HOME", add_home.join("config"))
            .env("VISIT_SCRIBE_URL", &url)
            .args(["--data-dir", &add_dir, "add", &audio_arg, "--name", "Visit 1"])
            .output()
            .expect("Failed to execute command")
    })
    .await
    .unwrap();

    assert!(
        output.status.success(),
        "add failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Patient reports improvement."),
        "Expected transcript on stdout, got: {}",
        stdout
    );

    // Pick the id back up from list, then export by prefix
    let list_dir = data_dir.clone();
    let list_home = home_path.clone();
    let output = tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_visit-scribe"))
            .env("HOME", &list_home)
            .env("XDG_CONFIG_HOME", list_home.join("config"))
            .env("NO_COLOR", "1")
            .args(["--data-dir", &list_dir, "list"])
            .output()
            .expect("Failed to execute command")
    })
    .await
    .unwrap();
    assert!(output.status.success());
    let listing = String::from_utf8_lossy(&output.stdout).to_string();
    let short_id: String = listing.chars().take(8).collect();
    assert_eq!(short_id.len(), 8, "list output: {}", listing);

    let out_dir = home.path().join("out").to_string_lossy().to_string();

    let output = tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_visit-scribe"))
            .env("HOME", &home_path)
            .env("XDG_CONFIG_HOME", home_path.join("config"))
            .args([
                "--data-dir",
                &data_dir,
                "export",
                &short_id,
                "--output",
                &out_dir,
            ])
            .output()
            .expect("Failed to execute command")
    })
    .await
    .unwrap();

    assert!(
        output.status.success(),
        "export failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let exported = std::fs::read_to_string(home.path().join("out").join("Visit 1.txt")).unwrap();
    assert_eq!(exported, "Patient reports improvement.");
}
