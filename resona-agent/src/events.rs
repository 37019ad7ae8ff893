//! Event system for the Resona agent
//!
//! The agent uses hybrid communication:
//! - **EventBus** (tokio::broadcast): one-to-many fan-out to SSE clients
//! - **Watch channel** (tokio::mpsc): raw filesystem notifications into the
//!   debounce loop
//!
//! This module re-exports the shared event types from resona-common and
//! defines the agent-internal event types.

use std::path::PathBuf;

// ========================================
// Re-exports from resona-common
// ========================================

pub use resona_common::events::{
    AgentEvent, ChangeBatch, EqualizerSnapshot, EventBus, BAND_COUNT, BAND_FREQUENCIES,
};

// ========================================
// Internal events (resona-agent only)
// ========================================

/// Kind of a raw, pre-debounce filesystem notification
///
/// Rename notifications are split into a `Removed` for the old path and an
/// `Added` for the new one before they reach the debounce loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    /// A file appeared
    Added,
    /// A file disappeared
    Removed,
    /// A file's contents or metadata changed
    Modified,
}

/// One raw filesystem notification handed from the watcher callback to the
/// debounce loop
///
/// Not serialized and never exposed via SSE; clients only ever see the
/// coalesced [`ChangeBatch`].
#[derive(Debug, Clone)]
pub struct WatchEvent {
    /// What happened
    pub kind: WatchEventKind,
    /// Absolute path the notification refers to
    pub path: PathBuf,
}
