//! JSON file recording store adapter
//!
//! Persists the whole record set as one JSON document under the data
//! directory. Every mutation is written to a temp file and renamed into
//! place, so a crash mid-write can never leave a half-written store, and
//! then published to the watch channels. Suited to the scale of a
//! personal recording library, not a multi-process database.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::application::ports::{listing_order, RecordingStore, StoreError};
use crate::domain::recording::{Recording, RecordingId, TranscriptionStatus};

/// File name of the record set inside the data directory
const STORE_FILE: &str = "recordings.json";

/// Subdirectory of the data directory holding managed audio files
pub fn audio_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("audio")
}

#[derive(Debug)]
struct StoreState {
    records: Vec<Recording>,
    watchers: HashMap<RecordingId, watch::Sender<Option<Recording>>>,
}

/// File-backed `RecordingStore`
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: RwLock<StoreState>,
    all_tx: watch::Sender<Vec<Recording>>,
}

impl JsonFileStore {
    /// Open the store in `data_dir`, creating the directory and starting
    /// empty when no store file exists yet.
    pub async fn open(data_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(data_dir)
            .await
            .map_err(|e| StoreError::WriteError(e.to_string()))?;

        let path = data_dir.join(STORE_FILE);
        let records = Self::load(&path).await?;
        debug!(path = %path.display(), count = records.len(), "recording store opened");

        let mut ordered = records.clone();
        ordered.sort_by(listing_order);
        let (all_tx, _) = watch::channel(ordered);

        Ok(Self {
            path,
            state: RwLock::new(StoreState {
                records,
                watchers: HashMap::new(),
            }),
            all_tx,
        })
    }

    async fn load(path: &Path) -> Result<Vec<Recording>, StoreError> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::ReadError(err.to_string())),
        };

        serde_json::from_str(&content).map_err(|e| StoreError::ParseError(e.to_string()))
    }

    /// Write the record set to a temp file and rename it into place.
    /// Callers hold the write lock, so there is never more than one
    /// writer.
    async fn persist(&self, records: &[Recording]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError::WriteError(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::WriteError(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::WriteError(e.to_string()))?;
        Ok(())
    }

    /// Notify watchers of the current state of `id` and of the full set.
    /// Channels nobody listens to anymore are pruned here.
    fn publish(state: &mut StoreState, all_tx: &watch::Sender<Vec<Recording>>, id: RecordingId) {
        let current = state.records.iter().find(|r| r.id == id).cloned();
        let prune = match state.watchers.get(&id) {
            Some(tx) if tx.receiver_count() == 0 => true,
            Some(tx) => {
                let _ = tx.send(current);
                false
            }
            None => false,
        };
        if prune {
            state.watchers.remove(&id);
        }

        let mut ordered = state.records.clone();
        ordered.sort_by(listing_order);
        let _ = all_tx.send(ordered);
    }

    /// Apply `mutate` to the record for `id`, persisting before the
    /// in-memory state is touched. A failed write leaves memory and the
    /// watch channels on the last committed state.
    async fn commit<F>(&self, id: RecordingId, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Recording),
    {
        let mut state = self.state.write().await;
        let index = state
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let mut updated = state.records.clone();
        mutate(&mut updated[index]);
        self.persist(&updated).await?;

        state.records = updated;
        Self::publish(&mut state, &self.all_tx, id);
        Ok(())
    }
}

#[async_trait]
impl RecordingStore for JsonFileStore {
    async fn create(
        &self,
        name: &str,
        file_path: &Path,
        recorded_at: DateTime<Utc>,
        status: TranscriptionStatus,
    ) -> Result<Recording, StoreError> {
        let recording = Recording::new(name, file_path, recorded_at, status);

        let mut state = self.state.write().await;
        let mut updated = state.records.clone();
        updated.push(recording.clone());
        self.persist(&updated).await?;

        state.records = updated;
        Self::publish(&mut state, &self.all_tx, recording.id);
        Ok(recording)
    }

    async fn find_by_path(&self, path: &Path) -> Result<Option<Recording>, StoreError> {
        let state = self.state.read().await;
        Ok(state.records.iter().find(|r| r.file_path == path).cloned())
    }

    async fn get(&self, id: RecordingId) -> Result<Option<Recording>, StoreError> {
        let state = self.state.read().await;
        Ok(state.records.iter().find(|r| r.id == id).cloned())
    }

    async fn observe(&self, id: RecordingId) -> watch::Receiver<Option<Recording>> {
        let mut state = self.state.write().await;
        let current = state.records.iter().find(|r| r.id == id).cloned();
        state
            .watchers
            .entry(id)
            .or_insert_with(|| watch::channel(current).0)
            .subscribe()
    }

    fn observe_all(&self) -> watch::Receiver<Vec<Recording>> {
        self.all_tx.subscribe()
    }

    async fn update_name(&self, id: RecordingId, name: &str) -> Result<(), StoreError> {
        self.commit(id, |r| r.name = name.to_string()).await
    }

    async fn update_status(
        &self,
        id: RecordingId,
        status: TranscriptionStatus,
    ) -> Result<(), StoreError> {
        self.commit(id, |r| r.status = status).await
    }

    async fn update_transcript_and_status(
        &self,
        id: RecordingId,
        transcript: &str,
        status: TranscriptionStatus,
    ) -> Result<(), StoreError> {
        self.commit(id, |r| {
            r.transcript = Some(transcript.to_string());
            r.status = status;
        })
        .await
    }

    async fn replace(&self, recording: &Recording) -> Result<(), StoreError> {
        self.commit(recording.id, |r| *r = recording.clone()).await
    }

    async fn delete(&self, id: RecordingId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.records.iter().any(|r| r.id == id) {
            return Err(StoreError::NotFound(id));
        }

        let mut updated = state.records.clone();
        updated.retain(|r| r.id != id);
        self.persist(&updated).await?;

        state.records = updated;
        Self::publish(&mut state, &self.all_tx, id);
        Ok(())
    }
}
