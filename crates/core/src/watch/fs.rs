use super::{ChangeHub, WatchBackend};
use crate::error::Result;
use modscope_api::FileEvent;
use notify::event::{CreateKind, ModifyKind};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Map a notify event onto the events cache lines understand.
pub fn translate_event(kind: &EventKind) -> Option<FileEvent> {
    match kind {
        EventKind::Create(CreateKind::Folder) => Some(FileEvent::FolderCreated),
        EventKind::Create(_) => Some(FileEvent::FileCreated),
        EventKind::Modify(ModifyKind::Metadata(_)) => Some(FileEvent::AttributeChanged),
        EventKind::Modify(ModifyKind::Name(_)) => Some(FileEvent::Renamed),
        EventKind::Modify(_) => Some(FileEvent::Changed),
        EventKind::Remove(_) => Some(FileEvent::Deleted),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}

/// Watches parent directories non-recursively, so single files can be
/// watched before they exist. Directories are reference counted.
pub struct NotifyBackend {
    watcher: Mutex<RecommendedWatcher>,
    watched: Mutex<HashMap<PathBuf, usize>>,
}

impl NotifyBackend {
    fn directory_of(path: &Path) -> PathBuf {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => path.to_path_buf(),
        }
    }
}

impl WatchBackend for NotifyBackend {
    fn watch(&self, path: &Path) {
        let dir = Self::directory_of(path);
        let mut watched = self.watched.lock().unwrap();
        let count = watched.entry(dir.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            if let Err(e) = self
                .watcher
                .lock()
                .unwrap()
                .watch(&dir, RecursiveMode::NonRecursive)
            {
                tracing::warn!("Failed to watch {}: {}", dir.display(), e);
            }
        }
    }

    fn unwatch(&self, path: &Path) {
        let dir = Self::directory_of(path);
        let mut watched = self.watched.lock().unwrap();
        let Some(count) = watched.get_mut(&dir) else {
            return;
        };
        *count -= 1;
        if *count == 0 {
            watched.remove(&dir);
            let _ = self.watcher.lock().unwrap().unwatch(&dir);
        }
    }
}

/// OS file watcher feeding a [`ChangeHub`].
pub struct FsWatcher {
    backend: Arc<NotifyBackend>,
    rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl FsWatcher {
    pub fn new() -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;
        Ok(Self {
            backend: Arc::new(NotifyBackend {
                watcher: Mutex::new(watcher),
                watched: Mutex::new(HashMap::new()),
            }),
            rx,
        })
    }

    /// Backend to hand to [`ChangeHub::with_backend`].
    pub fn backend(&self) -> Arc<dyn WatchBackend> {
        self.backend.clone()
    }

    async fn next_event_async(&mut self) -> Option<Event> {
        loop {
            match self.rx.recv().await {
                Some(Ok(event)) => return Some(event),
                Some(Err(e)) => tracing::warn!("Watch error: {}", e),
                None => return None,
            }
        }
    }

    /// Forward OS events to `hub` until `cancel_token` is cancelled.
    pub fn spawn_pump(
        mut self,
        hub: Arc<ChangeHub>,
        cancel_token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!("File watcher started");
            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    event = self.next_event_async() => {
                        let Some(event) = event else { break };
                        let Some(kind) = translate_event(&event.kind) else { continue };
                        for path in &event.paths {
                            let reached = hub.dispatch(path, kind);
                            if reached > 0 {
                                tracing::debug!(
                                    "{:?} on {} reached {} listeners",
                                    kind,
                                    path.display(),
                                    reached
                                );
                            }
                        }
                    }
                }
            }
            tracing::info!("File watcher stopped");
        })
    }
}
