//! Audio playback port interface

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors that can occur when starting or running playback
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The audio file could not be opened or decoded
    #[error("Failed to open audio file: {0}")]
    OpenFailed(String),

    /// No audio output device available
    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Playback could not be started
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Cheap clonable handle that asks a running playback to stop
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    stop_flag: Arc<AtomicBool>,
}

impl PlaybackHandle {
    /// Request the backend to stop. Safe to call more than once.
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }
}

/// Backend-side driver for one playback. The backend polls `should_stop`
/// while audio is running and calls `finished` exactly once when playback
/// ends, for any reason.
#[derive(Debug)]
pub struct PlaybackDriver {
    stop_flag: Arc<AtomicBool>,
    done: oneshot::Sender<()>,
}

impl PlaybackDriver {
    /// Check whether a stop has been requested
    pub fn should_stop(&self) -> bool {
        self.stop_flag.load(Ordering::SeqCst)
    }

    /// Report that playback has ended
    pub fn finished(self) {
        let _ = self.done.send(());
    }
}

/// One live playback, as seen by the caller
#[derive(Debug)]
pub struct PlaybackSession {
    handle: PlaybackHandle,
    done: oneshot::Receiver<()>,
}

impl PlaybackSession {
    /// Create a session plus the backend-side driver that feeds it
    pub fn channel() -> (Self, PlaybackDriver) {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let (done_tx, done_rx) = oneshot::channel();
        (
            Self {
                handle: PlaybackHandle {
                    stop_flag: stop_flag.clone(),
                },
                done: done_rx,
            },
            PlaybackDriver {
                stop_flag,
                done: done_tx,
            },
        )
    }

    /// Split into the stop handle and the end-of-playback signal
    pub fn into_parts(self) -> (PlaybackHandle, oneshot::Receiver<()>) {
        (self.handle, self.done)
    }
}

/// Port for an audio output backend
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Prepare and begin playback of the audio file at `path`.
    /// Resolves once audio is actually running, so the caller can
    /// publish the playing state without a gap.
    async fn start(&self, path: &Path) -> Result<PlaybackSession, PlaybackError>;
}
