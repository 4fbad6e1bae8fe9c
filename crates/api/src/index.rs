//! Project index and root mapping queries.

use crate::models::ArtifactId;
use crate::watch::{ChangeListener, ListenerId};
use std::io;
use std::sync::{Arc, Weak};

/// Stored attribute holding the module name recorded while indexing a source root.
pub const ATTR_MODULE_NAME: &str = "module-name";

pub trait IndexMapping: Send + Sync {
    /// Source root whose compiled output is the class folder `root`.
    fn source_root_for_class_folder(&self, root: &ArtifactId) -> Option<ArtifactId>;

    /// Whether the source root has been completely indexed.
    fn is_fully_indexed(&self, source_root: &ArtifactId) -> bool;

    fn stored_attribute(&self, source_root: &ArtifactId, name: &str) -> io::Result<Option<String>>;
}

/// Answer of a source-for-binary query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRoots {
    pub roots: Vec<ArtifactId>,
    /// Sources should be consulted instead of the binary's own metadata.
    pub prefer_sources: bool,
}

pub trait SourceForBinaryLookup: Send + Sync {
    fn find_source_roots(&self, binary_root: &ArtifactId) -> SourceRoots;
}

/// Live result of a binary-for-source query.
pub trait BinaryRoots: Send + Sync {
    fn roots(&self) -> Vec<ArtifactId>;

    /// Listeners are held weakly and notified whenever `roots()` changes.
    fn add_change_listener(&self, id: ListenerId, listener: Weak<dyn ChangeListener>);

    fn remove_change_listener(&self, id: ListenerId) -> bool;
}

pub trait BinaryForSourceLookup: Send + Sync {
    fn find_binary_roots(&self, source_root: &ArtifactId) -> Arc<dyn BinaryRoots>;
}
