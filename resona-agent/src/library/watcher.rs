//! Debounced folder watching
//!
//! A [`FolderWatch`] owns an OS-level recursive watch on one folder plus a
//! debounce task on the tokio runtime. Raw notifications flow from the
//! notify callback thread over an unbounded channel into the debounce loop,
//! which filters non-audio paths, coalesces bursts, and emits a single
//! `LibraryChanged` event per quiet period.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use resona_common::events::{AgentEvent, EventBus};
use resona_common::media;

use super::batch::PendingBatch;
use crate::error::{Error, Result};
use crate::events::{WatchEvent, WatchEventKind};

/// Quiet period after the last qualifying event before a batch is flushed.
///
/// A bulk copy of many files produces one batch, not one notification per
/// file.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(600);

/// An active watch over one library folder
pub struct FolderWatch {
    id: Uuid,
    folder: PathBuf,
    started_at: chrono::DateTime<chrono::Utc>,
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
    // Dropping the watcher detaches the OS-level watch
    watcher: RecommendedWatcher,
}

impl FolderWatch {
    /// Start watching `folder` recursively, emitting batches on `bus`.
    ///
    /// Fails softly if the folder does not exist or is not a directory.
    pub fn start(folder: PathBuf, bus: Arc<EventBus>) -> Result<Self> {
        let metadata = std::fs::metadata(&folder)
            .map_err(|e| Error::Watch(format!("Cannot access {}: {}", folder.display(), e)))?;
        if !metadata.is_dir() {
            return Err(Error::Watch(format!(
                "Not a directory: {}",
                folder.display()
            )));
        }

        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher =
            notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
                match result {
                    Ok(event) => {
                        for (kind, path) in classify(&event) {
                            // A closed receiver means the watch is shutting down
                            if tx.send(WatchEvent { kind, path }).is_err() {
                                break;
                            }
                        }
                    }
                    Err(e) => warn!("Filesystem notification error: {}", e),
                }
            })?;
        watcher.watch(&folder, RecursiveMode::Recursive)?;

        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_batcher(rx, cancel.clone(), Arc::clone(&bus), id));
        debug!("Folder watch {} started on {}", id, folder.display());

        Ok(Self {
            id,
            folder,
            started_at: chrono::Utc::now(),
            cancel,
            task,
            watcher,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn started_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.started_at
    }

    /// Stop watching.
    ///
    /// Cancels the debounce task before it can fire again, so changes still
    /// pending in the window are discarded rather than flushed after
    /// teardown.
    pub async fn stop(self) {
        let FolderWatch {
            id,
            cancel,
            task,
            watcher,
            ..
        } = self;
        cancel.cancel();
        drop(watcher);
        let _ = task.await;
        debug!("Folder watch {} stopped", id);
    }
}

/// Translate one raw notify event into zero or more internal watch events.
///
/// Renames become a removal of the old path and an addition of the new one;
/// access-only notifications are dropped.
pub(crate) fn classify(event: &notify::Event) -> Vec<(WatchEventKind, PathBuf)> {
    let spread = |kind: WatchEventKind| -> Vec<(WatchEventKind, PathBuf)> {
        event.paths.iter().cloned().map(|p| (kind, p)).collect()
    };

    match &event.kind {
        EventKind::Create(_) => spread(WatchEventKind::Added),
        EventKind::Remove(_) => spread(WatchEventKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => spread(WatchEventKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => spread(WatchEventKind::Added),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            // Paths arrive ordered [old, new]
            let mut out = Vec::new();
            if let Some(old) = event.paths.first() {
                out.push((WatchEventKind::Removed, old.clone()));
            }
            if let Some(new) = event.paths.get(1) {
                out.push((WatchEventKind::Added, new.clone()));
            }
            out
        }
        EventKind::Modify(_) => spread(WatchEventKind::Modified),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
    }
}

/// The debounce loop: filter, classify, coalesce, flush.
///
/// Every qualifying event re-arms the flush deadline; when the deadline
/// expires uninterrupted and anything accumulated, exactly one
/// `LibraryChanged` event goes out and the pending batch resets.
pub(crate) async fn run_batcher(
    mut rx: mpsc::UnboundedReceiver<WatchEvent>,
    cancel: CancellationToken,
    bus: Arc<EventBus>,
    watch_id: Uuid,
) {
    let mut pending = PendingBatch::new();
    let mut deadline: Option<Instant> = None;

    loop {
        // Placeholder instant keeps the select arm well-formed while no
        // flush is armed; the branch guard prevents it from being polled.
        let flush_at = deadline.unwrap_or_else(|| Instant::now() + DEBOUNCE_WINDOW);

        tokio::select! {
            _ = cancel.cancelled() => break,

            event = rx.recv() => match event {
                Some(event) => {
                    if !media::is_audio_path(&event.path) {
                        continue;
                    }
                    pending.record(event.kind, event.path);
                    deadline = Some(Instant::now() + DEBOUNCE_WINDOW);
                }
                None => break,
            },

            _ = tokio::time::sleep_until(flush_at), if deadline.is_some() => {
                deadline = None;
                let batch = pending.drain();
                if !batch.is_empty() {
                    debug!("Flushing library change batch of {} paths", batch.len());
                    bus.emit_lossy(AgentEvent::library_changed(watch_id, batch));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind};
    use resona_common::events::AgentEvent;

    fn notify_event(kind: EventKind, paths: Vec<&str>) -> notify::Event {
        let mut event = notify::Event::new(kind);
        for path in paths {
            event.paths.push(PathBuf::from(path));
        }
        event
    }

    #[test]
    fn test_classify_create_and_remove() {
        let created = notify_event(EventKind::Create(CreateKind::File), vec!["/m/a.mp3"]);
        assert_eq!(
            classify(&created),
            vec![(WatchEventKind::Added, PathBuf::from("/m/a.mp3"))]
        );

        let removed = notify_event(EventKind::Remove(RemoveKind::File), vec!["/m/a.mp3"]);
        assert_eq!(
            classify(&removed),
            vec![(WatchEventKind::Removed, PathBuf::from("/m/a.mp3"))]
        );
    }

    #[test]
    fn test_classify_modifications() {
        let data = notify_event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            vec!["/m/a.mp3"],
        );
        assert_eq!(
            classify(&data),
            vec![(WatchEventKind::Modified, PathBuf::from("/m/a.mp3"))]
        );

        let metadata = notify_event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)),
            vec!["/m/a.mp3"],
        );
        assert_eq!(
            classify(&metadata),
            vec![(WatchEventKind::Modified, PathBuf::from("/m/a.mp3"))]
        );
    }

    #[test]
    fn test_classify_renames() {
        let from = notify_event(
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            vec!["/m/old.mp3"],
        );
        assert_eq!(
            classify(&from),
            vec![(WatchEventKind::Removed, PathBuf::from("/m/old.mp3"))]
        );

        let to = notify_event(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            vec!["/m/new.mp3"],
        );
        assert_eq!(
            classify(&to),
            vec![(WatchEventKind::Added, PathBuf::from("/m/new.mp3"))]
        );

        let both = notify_event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            vec!["/m/old.mp3", "/m/new.mp3"],
        );
        assert_eq!(
            classify(&both),
            vec![
                (WatchEventKind::Removed, PathBuf::from("/m/old.mp3")),
                (WatchEventKind::Added, PathBuf::from("/m/new.mp3")),
            ]
        );
    }

    #[test]
    fn test_classify_drops_access_events() {
        let access = notify_event(
            EventKind::Access(notify::event::AccessKind::Any),
            vec!["/m/a.mp3"],
        );
        assert!(classify(&access).is_empty());
    }

    // ------------------------------------------------------------------
    // Debounce loop tests run under a paused clock so the 600 ms window
    // elapses deterministically.
    // ------------------------------------------------------------------

    struct Harness {
        tx: mpsc::UnboundedSender<WatchEvent>,
        cancel: CancellationToken,
        task: tokio::task::JoinHandle<()>,
        events: tokio::sync::broadcast::Receiver<AgentEvent>,
        watch_id: Uuid,
    }

    fn spawn_batcher() -> Harness {
        let bus = Arc::new(EventBus::new(16));
        let events = bus.subscribe();
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let watch_id = Uuid::new_v4();
        let task = tokio::spawn(run_batcher(rx, cancel.clone(), bus, watch_id));
        Harness {
            tx,
            cancel,
            task,
            events,
            watch_id,
        }
    }

    fn send(harness: &Harness, kind: WatchEventKind, path: &str) {
        harness
            .tx
            .send(WatchEvent {
                kind,
                path: PathBuf::from(path),
            })
            .unwrap();
    }

    async fn expect_batch(harness: &mut Harness) -> (Vec<PathBuf>, Vec<PathBuf>, Vec<PathBuf>) {
        let event = tokio::time::timeout(Duration::from_secs(10), harness.events.recv())
            .await
            .expect("expected a batch flush")
            .unwrap();
        match event {
            AgentEvent::LibraryChanged {
                watch_id,
                added,
                removed,
                changed,
                ..
            } => {
                assert_eq!(watch_id, harness.watch_id);
                (added, removed, changed)
            }
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    async fn expect_no_batch(harness: &mut Harness) {
        let result = tokio::time::timeout(Duration::from_secs(5), harness.events.recv()).await;
        assert!(result.is_err(), "no batch should have been flushed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_within_one_window_flushes_once() {
        let mut harness = spawn_batcher();

        for i in 0..5 {
            send(&harness, WatchEventKind::Added, &format!("/m/track{i}.mp3"));
        }

        let (added, removed, changed) = expect_batch(&mut harness).await;
        assert_eq!(added.len(), 5);
        assert!(removed.is_empty());
        assert!(changed.is_empty());

        // The burst produced exactly one batch
        expect_no_batch(&mut harness).await;

        harness.cancel.cancel();
        harness.task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_final_bucket_matches_most_recent_event() {
        let mut harness = spawn_batcher();

        send(&harness, WatchEventKind::Added, "/m/a.mp3");
        send(&harness, WatchEventKind::Modified, "/m/a.mp3");

        let (added, removed, changed) = expect_batch(&mut harness).await;
        assert!(added.is_empty());
        assert!(removed.is_empty());
        assert_eq!(changed, vec![PathBuf::from("/m/a.mp3")]);

        harness.cancel.cancel();
        harness.task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupported_extensions_never_schedule_a_flush() {
        let mut harness = spawn_batcher();

        send(&harness, WatchEventKind::Added, "/m/cover.jpg");
        send(&harness, WatchEventKind::Modified, "/m/notes.txt");

        expect_no_batch(&mut harness).await;

        harness.cancel.cancel();
        harness.task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_watch_emits_nothing() {
        let mut harness = spawn_batcher();

        expect_no_batch(&mut harness).await;

        harness.cancel.cancel();
        harness.task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_flush_separately() {
        let mut harness = spawn_batcher();

        send(&harness, WatchEventKind::Added, "/m/a.mp3");
        let (added, _, _) = expect_batch(&mut harness).await;
        assert_eq!(added, vec![PathBuf::from("/m/a.mp3")]);

        send(&harness, WatchEventKind::Modified, "/m/a.mp3");
        let (added, _, changed) = expect_batch(&mut harness).await;
        assert!(added.is_empty());
        assert_eq!(changed, vec![PathBuf::from("/m/a.mp3")]);

        harness.cancel.cancel();
        harness.task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_extension_burst_only_batches_audio() {
        let mut harness = spawn_batcher();

        send(&harness, WatchEventKind::Added, "/m/a.mp3");
        send(&harness, WatchEventKind::Added, "/m/cover.jpg");
        send(&harness, WatchEventKind::Added, "/m/b.FLAC");

        let (added, _, _) = expect_batch(&mut harness).await;
        assert_eq!(
            added,
            vec![PathBuf::from("/m/a.mp3"), PathBuf::from("/m/b.FLAC")]
        );

        harness.cancel.cancel();
        harness.task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending_batch() {
        let mut harness = spawn_batcher();

        send(&harness, WatchEventKind::Added, "/m/a.mp3");
        // Give the loop a chance to pick the event up, then cancel before
        // the window can elapse
        tokio::task::yield_now().await;
        harness.cancel.cancel();
        harness.task.await.unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), harness.events.recv()).await;
        match result {
            Err(_) => {}
            Ok(Err(_)) => {} // channel closed without an event: also fine
            Ok(Ok(event)) => panic!("stray flush after stop: {:?}", event),
        }
    }
}
