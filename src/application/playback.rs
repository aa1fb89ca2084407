//! Playback controller use case
//!
//! Owns the single system-wide playback resource. Whatever path start and
//! stop calls take, at most one file is audible at a time, and the
//! observable state always reflects what is actually playing.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info};

use super::ports::{AudioOutput, PlaybackError, PlaybackHandle};

/// The controller's observable state: which path is playing, if any
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaybackState {
    pub path: Option<PathBuf>,
    pub is_playing: bool,
}

impl PlaybackState {
    fn playing(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            is_playing: true,
        }
    }
}

/// The currently held playback resource. Dropping it asks the backend to
/// stop, so the resource is released on every exit path, including
/// teardown of the controller itself.
struct ActivePlayback {
    path: PathBuf,
    handle: PlaybackHandle,
    generation: u64,
}

impl Drop for ActivePlayback {
    fn drop(&mut self) {
        self.handle.request_stop();
    }
}

/// Controls playback through an audio output backend
pub struct PlaybackController<P: AudioOutput> {
    output: P,
    active: Arc<Mutex<Option<ActivePlayback>>>,
    state_tx: Arc<watch::Sender<PlaybackState>>,
    generations: AtomicU64,
}

impl<P: AudioOutput> PlaybackController<P> {
    /// Create a controller with nothing playing
    pub fn new(output: P) -> Self {
        let (state_tx, _) = watch::channel(PlaybackState::default());
        Self {
            output,
            active: Arc::new(Mutex::new(None)),
            state_tx: Arc::new(state_tx),
            generations: AtomicU64::new(0),
        }
    }

    /// Subscribe to playback state changes. The receiver is seeded with
    /// the current state.
    pub fn observe(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    /// Get the current playback state
    pub fn current(&self) -> PlaybackState {
        self.state_tx.borrow().clone()
    }

    /// Toggle playback of `path`: stop it if it is the one playing,
    /// otherwise play it (stopping whatever else was playing first).
    ///
    /// # Returns
    /// Whether `path` is playing after the call
    pub async fn toggle(&self, path: &Path) -> Result<bool, PlaybackError> {
        let mut active = self.active.lock().await;
        if active.as_ref().map(|a| a.path.as_path()) == Some(path) {
            Self::release(&mut active, &self.state_tx);
            return Ok(false);
        }
        self.start_locked(&mut active, path).await?;
        Ok(true)
    }

    /// Play `path`, stopping any current playback first
    pub async fn start(&self, path: &Path) -> Result<(), PlaybackError> {
        let mut active = self.active.lock().await;
        self.start_locked(&mut active, path).await
    }

    /// Stop playback. Idempotent when nothing is playing.
    pub async fn stop(&self) {
        let mut active = self.active.lock().await;
        Self::release(&mut active, &self.state_tx);
    }

    async fn start_locked(
        &self,
        active: &mut Option<ActivePlayback>,
        path: &Path,
    ) -> Result<(), PlaybackError> {
        Self::release(active, &self.state_tx);

        // On failure the released state from above is already correct.
        let session = self.output.start(path).await?;
        let (handle, done) = session.into_parts();
        let generation = self.generations.fetch_add(1, Ordering::SeqCst);

        *active = Some(ActivePlayback {
            path: path.to_path_buf(),
            handle,
            generation,
        });
        self.state_tx
            .send_replace(PlaybackState::playing(path.to_path_buf()));
        info!(path = %path.display(), "playback started");

        // End watcher: clears the state when playback ends on its own,
        // unless a newer playback or an explicit stop got there first.
        let active_ref = Arc::clone(&self.active);
        let state_tx = Arc::clone(&self.state_tx);
        tokio::spawn(async move {
            let _ = done.await;
            let mut active = active_ref.lock().await;
            if active.as_ref().map(|a| a.generation) == Some(generation) {
                *active = None;
                state_tx.send_replace(PlaybackState::default());
                debug!("playback ended");
            }
        });

        Ok(())
    }

    /// Drop the held resource, if any, and publish the stopped state.
    /// Dropping the `ActivePlayback` signals the backend to stop.
    fn release(active: &mut Option<ActivePlayback>, state_tx: &watch::Sender<PlaybackState>) {
        if let Some(released) = active.take() {
            info!(path = %released.path.display(), "playback stopped");
            state_tx.send_replace(PlaybackState::default());
        }
    }
}

impl<P: AudioOutput> Drop for PlaybackController<P> {
    fn drop(&mut self) {
        // Best effort: if the lock is contended another call is already
        // managing the resource.
        if let Ok(mut active) = self.active.try_lock() {
            active.take();
        }
    }
}
