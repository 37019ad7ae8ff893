//! Pending change accumulation for the debounce window
//!
//! Invariant: a path lives in at most one of the three sets at any time. A
//! later event for the same path supersedes the earlier one and relocates
//! the path, never duplicates it.

use std::collections::BTreeSet;
use std::path::PathBuf;

use resona_common::events::ChangeBatch;

use crate::events::WatchEventKind;

/// Changes accumulated since the last flush
///
/// Created empty at watcher start, mutated by every qualifying filesystem
/// event, drained and reset atomically when the debounce timer fires.
/// `BTreeSet` keeps drain order deterministic.
#[derive(Debug, Default)]
pub struct PendingBatch {
    added: BTreeSet<PathBuf>,
    removed: BTreeSet<PathBuf>,
    changed: BTreeSet<PathBuf>,
}

impl PendingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one qualifying event, keeping only the most recent kind per path
    pub fn record(&mut self, kind: WatchEventKind, path: PathBuf) {
        self.added.remove(&path);
        self.removed.remove(&path);
        self.changed.remove(&path);

        match kind {
            WatchEventKind::Added => self.added.insert(path),
            WatchEventKind::Removed => self.removed.insert(path),
            WatchEventKind::Modified => self.changed.insert(path),
        };
    }

    /// True when nothing has accumulated since the last drain
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Take everything accumulated so far, leaving the batch empty
    pub fn drain(&mut self) -> ChangeBatch {
        ChangeBatch {
            added: std::mem::take(&mut self.added).into_iter().collect(),
            removed: std::mem::take(&mut self.removed).into_iter().collect(),
            changed: std::mem::take(&mut self.changed).into_iter().collect(),
        }
    }
}
