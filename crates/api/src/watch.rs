//! Change-notification contracts.
//!
//! Listeners are registered under a caller-chosen [`ListenerId`] so that the
//! owner can unregister itself without holding on to the registration.

use crate::models::{FileEvent, FileRef};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Process-wide unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

pub trait FileChangeListener: Send + Sync {
    fn file_event(&self, event: FileEvent);
}

/// Generic "result changed" listener used by query results.
pub trait ChangeListener: Send + Sync {
    fn state_changed(&self);
}

pub trait ChangeWatch: Send + Sync {
    /// Watch a real file system path. The watch keeps `listener` alive until
    /// [`ChangeWatch::unwatch_path`] is called with the same id.
    fn watch_path(&self, path: &Path, id: ListenerId, listener: Arc<dyn FileChangeListener>);

    /// Returns `false` if nothing was registered under `id`.
    fn unwatch_path(&self, path: &Path, id: ListenerId) -> bool;

    /// Watch a virtual entry. Only a weak reference to the listener is kept.
    fn watch_entry(&self, entry: &FileRef, id: ListenerId, listener: Weak<dyn FileChangeListener>);

    fn unwatch_entry(&self, entry: &FileRef, id: ListenerId) -> bool;
}
