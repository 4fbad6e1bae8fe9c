//! A single cached resolution and the change subscription that guards it.

use modscope_api::{
    ArtifactId, BinaryRoots, ChangeListener, ChangeWatch, FileChangeListener, FileEvent, FileRef,
    ListenerId,
};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Result of reading a cache line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheRead<'a> {
    Valid(Option<&'a str>),
    /// The line was invalidated; its value must be recomputed.
    Stale,
}

/// Source of change notifications a line listens to.
pub enum Subscription {
    Unsubscribed,
    /// A real file on disk. The watch holds the line strongly.
    Path {
        watch: Weak<dyn ChangeWatch>,
        path: PathBuf,
    },
    /// A virtual entry. The watch holds the line weakly.
    Entry {
        watch: Weak<dyn ChangeWatch>,
        entry: FileRef,
    },
    /// The binary roots a derived name was computed from.
    DerivedRoots { roots: Arc<dyn BinaryRoots> },
}

impl Subscription {
    pub fn kind(&self) -> LineKind {
        match self {
            Subscription::Unsubscribed => LineKind::Unsubscribed,
            Subscription::Path { .. } => LineKind::PathWatch,
            Subscription::Entry { .. } => LineKind::VirtualFileWatch,
            Subscription::DerivedRoots { .. } => LineKind::DerivedRootsWatch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Unsubscribed,
    PathWatch,
    VirtualFileWatch,
    DerivedRootsWatch,
}

/// Cached module name of one root.
///
/// Invalidation is terminal: once `read` reports [`CacheRead::Stale`] it
/// does so forever, and the subscription is released exactly once.
pub struct CacheLine {
    artifact: ArtifactId,
    value: Option<String>,
    invalid: AtomicBool,
    id: ListenerId,
    subscription: Subscription,
    listens: AtomicBool,
}

impl CacheLine {
    fn new(artifact: ArtifactId, value: Option<String>, subscription: Subscription) -> Self {
        let listens = !matches!(subscription, Subscription::Unsubscribed);
        Self {
            artifact,
            value,
            invalid: AtomicBool::new(false),
            id: ListenerId::next(),
            subscription,
            listens: AtomicBool::new(listens),
        }
    }

    /// A line that only goes stale through an explicit [`CacheLine::invalidate`].
    pub fn plain(artifact: ArtifactId, value: Option<String>) -> Arc<Self> {
        Arc::new(Self::new(artifact, value, Subscription::Unsubscribed))
    }

    pub fn watching_path(
        artifact: ArtifactId,
        value: Option<String>,
        watch: &Arc<dyn ChangeWatch>,
        path: PathBuf,
    ) -> Arc<Self> {
        let line = Arc::new(Self::new(
            artifact,
            value,
            Subscription::Path {
                watch: Arc::downgrade(watch),
                path: path.clone(),
            },
        ));
        watch.watch_path(&path, line.id, line.clone());
        line
    }

    pub fn watching_entry(
        artifact: ArtifactId,
        value: Option<String>,
        watch: &Arc<dyn ChangeWatch>,
        entry: FileRef,
    ) -> Arc<Self> {
        let line = Arc::new(Self::new(
            artifact,
            value,
            Subscription::Entry {
                watch: Arc::downgrade(watch),
                entry: entry.clone(),
            },
        ));
        let listener: Weak<CacheLine> = Arc::downgrade(&line);
        watch.watch_entry(&entry, line.id, listener);
        line
    }

    /// Path watch when `file` exists on disk, entry watch otherwise.
    pub fn watching_file(
        artifact: ArtifactId,
        value: Option<String>,
        watch: &Arc<dyn ChangeWatch>,
        file: FileRef,
    ) -> Arc<Self> {
        match file.path.clone() {
            Some(path) => Self::watching_path(artifact, value, watch, path),
            None => Self::watching_entry(artifact, value, watch, file),
        }
    }

    pub fn watching_binary_roots(
        artifact: ArtifactId,
        value: Option<String>,
        roots: Arc<dyn BinaryRoots>,
    ) -> Arc<Self> {
        let line = Arc::new(Self::new(
            artifact,
            value,
            Subscription::DerivedRoots {
                roots: roots.clone(),
            },
        ));
        let listener: Weak<CacheLine> = Arc::downgrade(&line);
        roots.add_change_listener(line.id, listener);
        line
    }

    pub fn read(&self) -> CacheRead<'_> {
        if self.invalid.load(Ordering::Acquire) {
            CacheRead::Stale
        } else {
            CacheRead::Valid(self.value.as_deref())
        }
    }

    /// The stored value regardless of validity. Only meaningful right after
    /// construction, before the line is published.
    pub fn value_unchecked(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid.load(Ordering::Acquire)
    }

    /// Whether the subscription is still registered.
    pub fn is_listening(&self) -> bool {
        self.listens.load(Ordering::Acquire)
    }

    pub fn artifact(&self) -> &ArtifactId {
        &self.artifact
    }

    pub fn kind(&self) -> LineKind {
        self.subscription.kind()
    }

    pub fn invalidate(&self) {
        tracing::debug!("Invalidated cache for: {}", self.artifact);
        self.invalid.store(true, Ordering::Release);
        if self.listens.swap(false, Ordering::AcqRel) {
            self.release();
        }
    }

    fn release(&self) {
        match &self.subscription {
            Subscription::Unsubscribed => {}
            Subscription::Path { watch, path } => {
                if let Some(watch) = watch.upgrade() {
                    watch.unwatch_path(path, self.id);
                }
            }
            Subscription::Entry { watch, entry } => {
                if let Some(watch) = watch.upgrade() {
                    watch.unwatch_entry(entry, self.id);
                }
            }
            Subscription::DerivedRoots { roots } => {
                roots.remove_change_listener(self.id);
            }
        }
    }
}

impl FileChangeListener for CacheLine {
    fn file_event(&self, event: FileEvent) {
        if event.invalidates() {
            self.invalidate();
        }
    }
}

impl ChangeListener for CacheLine {
    fn state_changed(&self) {
        self.invalidate();
    }
}

impl fmt::Debug for CacheLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheLine")
            .field("artifact", &self.artifact)
            .field("value", &self.value)
            .field("kind", &self.kind())
            .field("invalid", &self.is_invalid())
            .finish()
    }
}
