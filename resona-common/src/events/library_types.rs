//! Library watch event payload types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A coalesced set of library file changes observed during one debounce window.
///
/// A path appears in at most one of the three lists: the watcher keeps only
/// the most recent event kind per path before flushing. Paths are sorted so
/// identical change sets always serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBatch {
    /// Files that appeared since the last flush
    pub added: Vec<PathBuf>,
    /// Files that disappeared since the last flush
    pub removed: Vec<PathBuf>,
    /// Files whose contents changed since the last flush
    pub changed: Vec<PathBuf>,
}

impl ChangeBatch {
    /// True when no change survived the debounce window
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Total number of paths across all three lists
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch() {
        let batch = ChangeBatch::default();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }

    #[test]
    fn test_len_counts_all_lists() {
        let batch = ChangeBatch {
            added: vec![PathBuf::from("/m/a.mp3"), PathBuf::from("/m/b.mp3")],
            removed: vec![PathBuf::from("/m/c.mp3")],
            changed: vec![],
        };
        assert!(!batch.is_empty());
        assert_eq!(batch.len(), 3);
    }
}
