//! Single-active-watch lifecycle management
//!
//! Exactly one folder watch may be active at a time. The manager owns the
//! active watch, so starting a new one always stops the previous one first;
//! callers cannot get this wrong by convention.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use resona_common::events::{AgentEvent, EventBus};

use super::watcher::FolderWatch;
use crate::error::Result;

/// Description of the currently active watch
#[derive(Debug, Clone, Serialize)]
pub struct WatchStatus {
    pub watch_id: Uuid,
    pub folder: PathBuf,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl WatchStatus {
    fn of(watch: &FolderWatch) -> Self {
        Self {
            watch_id: watch.id(),
            folder: watch.folder().to_path_buf(),
            started_at: watch.started_at(),
        }
    }
}

/// Owns the (at most one) active folder watch
pub struct WatchManager {
    bus: Arc<EventBus>,
    active: Mutex<Option<FolderWatch>>,
}

impl WatchManager {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            active: Mutex::new(None),
        }
    }

    /// Start watching `folder`, replacing any currently active watch.
    pub async fn start(&self, folder: PathBuf) -> Result<WatchStatus> {
        let mut active = self.active.lock().await;

        if let Some(previous) = active.take() {
            let (id, old_folder) = (previous.id(), previous.folder().to_path_buf());
            info!(
                "Replacing active watch on {} with {}",
                old_folder.display(),
                folder.display()
            );
            previous.stop().await;
            self.emit_stopped(id, old_folder);
        }

        let watch = FolderWatch::start(folder, Arc::clone(&self.bus))?;
        let status = WatchStatus::of(&watch);
        self.bus.emit_lossy(AgentEvent::FolderWatchStarted {
            watch_id: status.watch_id,
            folder: status.folder.clone(),
            timestamp: chrono::Utc::now(),
        });
        info!("Watching {}", status.folder.display());
        *active = Some(watch);
        Ok(status)
    }

    /// Stop the active watch.
    ///
    /// Fails softly when no watch is active, so the UI can tell a stale
    /// toggle from a successful stop.
    pub async fn stop(&self) -> Result<WatchStatus> {
        let mut active = self.active.lock().await;
        match active.take() {
            Some(watch) => {
                let status = WatchStatus::of(&watch);
                watch.stop().await;
                self.emit_stopped(status.watch_id, status.folder.clone());
                info!("Stopped watching {}", status.folder.display());
                Ok(status)
            }
            None => Err(crate::error::Error::Watch(
                "No active folder watch".to_string(),
            )),
        }
    }

    /// Current watch, if any
    pub async fn status(&self) -> Option<WatchStatus> {
        self.active.lock().await.as_ref().map(WatchStatus::of)
    }

    /// Tear down the active watch without treating absence as an error.
    /// Used on process shutdown.
    pub async fn shutdown(&self) {
        let mut active = self.active.lock().await;
        if let Some(watch) = active.take() {
            let (id, folder) = (watch.id(), watch.folder().to_path_buf());
            watch.stop().await;
            self.emit_stopped(id, folder);
        }
    }

    fn emit_stopped(&self, watch_id: Uuid, folder: PathBuf) {
        self.bus.emit_lossy(AgentEvent::FolderWatchStopped {
            watch_id,
            folder,
            timestamp: chrono::Utc::now(),
        });
    }
}
