//! In-process change notification hub.
//!
//! [`ChangeHub`] implements [`ChangeWatch`]: cache lines register here and
//! events are dispatched synchronously on the caller's thread. An optional
//! [`WatchBackend`] mirrors registrations into an OS-level watcher.

mod fs;

pub use fs::{FsWatcher, NotifyBackend, translate_event};

use dashmap::DashMap;
use modscope_api::{ArtifactId, ChangeWatch, FileChangeListener, FileEvent, FileRef, ListenerId};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

/// Receives the set of paths that need OS-level watching.
pub trait WatchBackend: Send + Sync {
    fn watch(&self, path: &Path);
    fn unwatch(&self, path: &Path);
}

type PathListeners = Vec<(ListenerId, Arc<dyn FileChangeListener>)>;
type EntryListeners = Vec<(ListenerId, Weak<dyn FileChangeListener>)>;

#[derive(Default)]
pub struct ChangeHub {
    paths: DashMap<PathBuf, PathListeners>,
    entries: DashMap<ArtifactId, EntryListeners>,
    backend: Option<Arc<dyn WatchBackend>>,
}

impl ChangeHub {
    /// A hub fed only through [`ChangeHub::dispatch`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(backend: Arc<dyn WatchBackend>) -> Self {
        Self {
            backend: Some(backend),
            ..Self::default()
        }
    }

    /// Notify listeners of `path`, and of every entry stored inside `path`.
    /// Returns the number of listeners reached.
    pub fn dispatch(&self, path: &Path, event: FileEvent) -> usize {
        let mut targets: Vec<Arc<dyn FileChangeListener>> = self
            .paths
            .get(path)
            .map(|listeners| listeners.iter().map(|(_, l)| l.clone()).collect())
            .unwrap_or_default();

        for entry in self.entries.iter() {
            if entry.key().backing_path().as_deref() == Some(path) {
                targets.extend(entry.value().iter().filter_map(|(_, l)| l.upgrade()));
            }
        }

        // Guards are gone: listeners unregister themselves from inside the callback.
        for listener in &targets {
            listener.file_event(event);
        }
        targets.len()
    }

    /// Notify listeners of a single virtual entry.
    pub fn dispatch_entry(&self, location: &ArtifactId, event: FileEvent) -> usize {
        let targets: Vec<Arc<dyn FileChangeListener>> = self
            .entries
            .get(location)
            .map(|listeners| listeners.iter().filter_map(|(_, l)| l.upgrade()).collect())
            .unwrap_or_default();

        for listener in &targets {
            listener.file_event(event);
        }
        targets.len()
    }

    pub fn path_listener_count(&self) -> usize {
        self.paths.iter().map(|e| e.value().len()).sum()
    }

    /// Entry listeners whose owner is still alive.
    pub fn entry_listener_count(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.value().iter().filter(|(_, l)| l.strong_count() > 0).count())
            .sum()
    }

    pub fn watched_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self.paths.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }
}

impl ChangeWatch for ChangeHub {
    fn watch_path(&self, path: &Path, id: ListenerId, listener: Arc<dyn FileChangeListener>) {
        self.paths
            .entry(path.to_path_buf())
            .or_default()
            .push((id, listener));
        if let Some(backend) = &self.backend {
            backend.watch(path);
        }
    }

    fn unwatch_path(&self, path: &Path, id: ListenerId) -> bool {
        let removed = match self.paths.get_mut(path) {
            Some(mut listeners) => {
                let before = listeners.len();
                listeners.retain(|(lid, _)| *lid != id);
                before != listeners.len()
            }
            None => false,
        };
        self.paths.remove_if(path, |_, listeners| listeners.is_empty());
        if removed {
            if let Some(backend) = &self.backend {
                backend.unwatch(path);
            }
        }
        removed
    }

    fn watch_entry(&self, entry: &FileRef, id: ListenerId, listener: Weak<dyn FileChangeListener>) {
        let pruned = {
            let mut listeners = self.entries.entry(entry.location.clone()).or_default();
            let before = listeners.len();
            listeners.retain(|(_, l)| l.strong_count() > 0);
            let pruned = before - listeners.len();
            listeners.push((id, listener));
            pruned
        };
        if let (Some(backend), Some(path)) = (&self.backend, entry.location.backing_path()) {
            for _ in 0..pruned {
                backend.unwatch(&path);
            }
            backend.watch(&path);
        }
    }

    fn unwatch_entry(&self, entry: &FileRef, id: ListenerId) -> bool {
        let removed = match self.entries.get_mut(&entry.location) {
            Some(mut listeners) => {
                let before = listeners.len();
                listeners.retain(|(lid, _)| *lid != id);
                before != listeners.len()
            }
            None => false,
        };
        self.entries
            .remove_if(&entry.location, |_, listeners| listeners.is_empty());
        if removed {
            if let (Some(backend), Some(path)) = (&self.backend, entry.location.backing_path()) {
                backend.unwatch(&path);
            }
        }
        removed
    }
}
