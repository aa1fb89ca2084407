//! Identity gating for display updates
//!
//! Long-running operations report transient progress through callbacks.
//! By the time such a callback fires, the user may be looking at a
//! different recording; the tracker lets the operation check whether its
//! id is still the one on display before touching the UI. Persisted
//! writes are never gated, only the transient updates.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::recording::RecordingId;

/// Callback that receives user-facing status text
pub type DisplayUpdate = Arc<dyn Fn(&str) + Send + Sync>;

/// Tracks which recording the display currently shows.
/// Cheap to clone; all clones share the same focus.
#[derive(Debug, Clone, Default)]
pub struct FocusTracker {
    current: Arc<RwLock<Option<RecordingId>>>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as the recording on display
    pub async fn focus(&self, id: RecordingId) {
        *self.current.write().await = Some(id);
    }

    /// Mark nothing as on display
    pub async fn clear(&self) {
        *self.current.write().await = None;
    }

    /// Check whether `id` is still the recording on display
    pub async fn is_current(&self, id: RecordingId) -> bool {
        *self.current.read().await == Some(id)
    }
}
