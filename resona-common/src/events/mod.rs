//! Event types for the Resona agent event system
//!
//! Provides the shared event definitions and the EventBus used to fan events
//! out to every connected client (SSE) and to in-process subscribers.

// Sub-modules (supporting types)
mod equalizer_types;
mod library_types;

pub use equalizer_types::{
    clamp_gain, EqualizerSnapshot, BAND_COUNT, BAND_FREQUENCIES, GAIN_MAX_DB, GAIN_MIN_DB,
};
pub use library_types::ChangeBatch;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Resona agent event types
///
/// Events are broadcast via [`EventBus`] and serialized for SSE transmission;
/// the `type` tag doubles as the SSE event name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AgentEvent {
    /// A library folder watch became active
    FolderWatchStarted {
        /// Identifier of the watch session
        watch_id: Uuid,
        /// Folder being watched
        folder: PathBuf,
        /// When the watch started
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The active library folder watch was stopped
    ///
    /// Emitted both for explicit stops and when a new watch replaces the
    /// previous one. Changes still pending in the debounce window at stop
    /// time are discarded, never flushed.
    FolderWatchStopped {
        /// Identifier of the watch session that ended
        watch_id: Uuid,
        /// Folder that was being watched
        folder: PathBuf,
        /// When the watch stopped
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// One debounced batch of audio file changes in the watched folder
    ///
    /// Triggers:
    /// - UI: refresh the local library view
    LibraryChanged {
        /// Identifier of the watch session that observed the changes
        watch_id: Uuid,
        /// Files that appeared
        added: Vec<PathBuf>,
        /// Files that disappeared
        removed: Vec<PathBuf>,
        /// Files whose contents changed
        changed: Vec<PathBuf>,
        /// When the batch was flushed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A one-shot library folder scan finished
    LibraryScanned {
        /// Folder that was scanned
        folder: PathBuf,
        /// Number of supported audio files found
        file_count: usize,
        /// Combined size of those files in bytes
        total_size: u64,
        /// When the scan completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Result of probing for the external equalizer program
    EqualizerDetected {
        /// Whether an install was found
        available: bool,
        /// Config file the agent will write, when available
        config_path: Option<PathBuf>,
        /// When detection ran
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The equalizer state changed and its config file was rewritten
    ///
    /// Triggers:
    /// - UI: move sliders / toggle to the applied values
    EqualizerChanged {
        /// Whether processing is enabled
        enabled: bool,
        /// Gain per band in dB
        gains: [f32; BAND_COUNT],
        /// When the change was applied
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl AgentEvent {
    /// Build a `LibraryChanged` event from a flushed batch, stamped now
    pub fn library_changed(watch_id: Uuid, batch: ChangeBatch) -> Self {
        AgentEvent::LibraryChanged {
            watch_id,
            added: batch.added,
            removed: batch.removed,
            changed: batch.changed,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Event type name, also used as the SSE event field
    pub fn event_type(&self) -> &'static str {
        match self {
            AgentEvent::FolderWatchStarted { .. } => "FolderWatchStarted",
            AgentEvent::FolderWatchStopped { .. } => "FolderWatchStopped",
            AgentEvent::LibraryChanged { .. } => "LibraryChanged",
            AgentEvent::LibraryScanned { .. } => "LibraryScanned",
            AgentEvent::EqualizerDetected { .. } => "EqualizerDetected",
            AgentEvent::EqualizerChanged { .. } => "EqualizerChanged",
        }
    }
}

/// One-to-many event broadcaster backed by `tokio::sync::broadcast`
///
/// Slow subscribers lag rather than block emitters; events emitted with no
/// subscribers are dropped (the agent must keep running with zero clients).
pub struct EventBus {
    tx: broadcast::Sender<AgentEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<AgentEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)`, or `Err` if no subscriber is listening.
    pub fn emit(
        &self,
        event: AgentEvent,
    ) -> Result<usize, broadcast::error::SendError<AgentEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, silently dropping it when nobody is listening
    pub fn emit_lossy(&self, event: AgentEvent) {
        let _ = self.tx.send(event);
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
