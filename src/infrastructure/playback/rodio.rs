//! Rodio-based audio output adapter
//!
//! Each playback owns a dedicated blocking thread: rodio's output stream
//! is not `Send`, so the stream, sink and decode pipeline all live on
//! that thread for the lifetime of the playback.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::oneshot;

use crate::application::ports::{AudioOutput, PlaybackDriver, PlaybackError, PlaybackSession};

/// How often the playback thread checks for a stop request or the end
/// of the audio
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Audio output implementation using rodio
pub struct RodioAudioOutput;

impl RodioAudioOutput {
    /// Create a new rodio-based audio output
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioAudioOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioOutput for RodioAudioOutput {
    async fn start(&self, path: &Path) -> Result<PlaybackSession, PlaybackError> {
        let (session, driver) = PlaybackSession::channel();
        let (ready_tx, ready_rx) = oneshot::channel();
        let path = path.to_path_buf();

        // Run playback in a blocking thread to avoid stalling the async
        // runtime; the handle is dropped, the thread lives as long as
        // the audio does.
        tokio::task::spawn_blocking(move || play_file_sync(&path, driver, ready_tx));

        match ready_rx.await {
            Ok(Ok(())) => Ok(session),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(PlaybackError::PlaybackFailed(
                "Audio thread stopped before playback began".to_string(),
            )),
        }
    }
}

/// Play a file synchronously (called from spawn_blocking). Reports
/// readiness through `ready` once audio is running, then polls for a stop
/// request or the natural end, and finally fires the driver's done signal.
fn play_file_sync(
    path: &Path,
    driver: PlaybackDriver,
    ready: oneshot::Sender<Result<(), PlaybackError>>,
) {
    let outcome = (|| {
        let file =
            File::open(path).map_err(|e| PlaybackError::OpenFailed(e.to_string()))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| PlaybackError::OpenFailed(e.to_string()))?;

        let (_stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;
        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;

        sink.append(source);
        Ok((_stream, sink))
    })();

    let (_stream, sink) = match outcome {
        Ok(playing) => playing,
        Err(err) => {
            let _ = ready.send(Err(err));
            driver.finished();
            return;
        }
    };

    let _ = ready.send(Ok(()));

    loop {
        if driver.should_stop() {
            sink.stop();
            break;
        }
        if sink.empty() {
            break;
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    driver.finished();
}
