use super::layout::ProjectLayout;
use crate::error::Result;
use dashmap::{DashMap, DashSet};
use modscope_api::index::ATTR_MODULE_NAME;
use modscope_api::{
    ArtifactId, BinaryForSourceLookup, BinaryRoots, ChangeListener, IndexMapping, ListenerId,
    SourceForBinaryLookup, SourceRoots,
};
use std::io;
use std::sync::{Arc, Mutex, RwLock, Weak};

/// Binary roots of one source root; notifies listeners when replaced.
#[derive(Default)]
pub struct LiveBinaryRoots {
    roots: RwLock<Vec<ArtifactId>>,
    listeners: Mutex<Vec<(ListenerId, Weak<dyn ChangeListener>)>>,
}

impl LiveBinaryRoots {
    pub fn new(roots: Vec<ArtifactId>) -> Self {
        Self {
            roots: RwLock::new(roots),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Replace the roots. Listeners fire only if something changed.
    pub fn set_roots(&self, roots: Vec<ArtifactId>) {
        {
            let mut current = self.roots.write().unwrap();
            if *current == roots {
                return;
            }
            *current = roots;
        }
        let targets: Vec<Arc<dyn ChangeListener>> = {
            let mut listeners = self.listeners.lock().unwrap();
            listeners.retain(|(_, l)| l.strong_count() > 0);
            listeners.iter().filter_map(|(_, l)| l.upgrade()).collect()
        };
        for listener in targets {
            listener.state_changed();
        }
    }

    /// Registered listeners, including ones whose owner is gone.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }
}

impl BinaryRoots for LiveBinaryRoots {
    fn roots(&self) -> Vec<ArtifactId> {
        self.roots.read().unwrap().clone()
    }

    fn add_change_listener(&self, id: ListenerId, listener: Weak<dyn ChangeListener>) {
        let mut listeners = self.listeners.lock().unwrap();
        listeners.retain(|(_, l)| l.strong_count() > 0);
        listeners.push((id, listener));
    }

    fn remove_change_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        before != listeners.len()
    }
}

/// Project structure known to the resolver: which class folders and
/// binaries come from which sources, and what indexing recorded.
#[derive(Default)]
pub struct ProjectIndex {
    class_folders: DashMap<ArtifactId, ArtifactId>,
    sources_by_binary: DashMap<ArtifactId, SourceRoots>,
    binaries_by_source: DashMap<ArtifactId, Arc<LiveBinaryRoots>>,
    indexed: DashSet<ArtifactId>,
    attributes: DashMap<(ArtifactId, String), String>,
}

impl ProjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_layout(layout: &ProjectLayout) -> Result<Self> {
        let index = Self::new();
        for project in &layout.projects {
            let sources = project
                .source_roots
                .iter()
                .map(|p| ArtifactId::folder(p))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            let binaries = project
                .binary_roots
                .iter()
                .map(|p| ArtifactId::from_path(p))
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let Some(primary) = sources.first().cloned() else {
                continue;
            };
            index.register_project(&sources, &binaries, project.prefer_sources);
            if let Some(class_folder) = &project.class_folder {
                index.register_class_folder(ArtifactId::folder(class_folder)?, primary.clone());
            }
            if project.indexed {
                for source in &sources {
                    index.mark_indexed(source.clone());
                }
            }
            if let Some(name) = &project.module_name {
                index.set_attribute(&primary, ATTR_MODULE_NAME, Some(name.clone()));
            }
        }
        Ok(index)
    }

    pub fn register_class_folder(&self, class_folder: ArtifactId, source_root: ArtifactId) {
        self.class_folders.insert(class_folder, source_root);
    }

    /// Bind source roots and the binaries built from them, both directions.
    pub fn register_project(
        &self,
        source_roots: &[ArtifactId],
        binary_roots: &[ArtifactId],
        prefer_sources: bool,
    ) {
        for binary in binary_roots {
            self.sources_by_binary.insert(
                binary.clone(),
                SourceRoots {
                    roots: source_roots.to_vec(),
                    prefer_sources,
                },
            );
        }
        for source in source_roots {
            self.set_binary_roots(source, binary_roots.to_vec());
        }
    }

    /// Replace the binaries of a source root, notifying derived names.
    pub fn set_binary_roots(&self, source_root: &ArtifactId, roots: Vec<ArtifactId>) {
        let live = self
            .binaries_by_source
            .entry(source_root.clone())
            .or_default()
            .clone();
        live.set_roots(roots);
    }

    pub fn mark_indexed(&self, source_root: ArtifactId) {
        self.indexed.insert(source_root);
    }

    pub fn set_attribute(&self, source_root: &ArtifactId, name: &str, value: Option<String>) {
        let key = (source_root.clone(), name.to_string());
        match value {
            Some(value) => {
                self.attributes.insert(key, value);
            }
            None => {
                self.attributes.remove(&key);
            }
        }
    }
}

impl IndexMapping for ProjectIndex {
    fn source_root_for_class_folder(&self, root: &ArtifactId) -> Option<ArtifactId> {
        self.class_folders.get(root).map(|e| e.value().clone())
    }

    fn is_fully_indexed(&self, source_root: &ArtifactId) -> bool {
        self.indexed.contains(source_root)
    }

    fn stored_attribute(&self, source_root: &ArtifactId, name: &str) -> io::Result<Option<String>> {
        let key = (source_root.clone(), name.to_string());
        Ok(self.attributes.get(&key).map(|e| e.value().clone()))
    }
}

impl SourceForBinaryLookup for ProjectIndex {
    fn find_source_roots(&self, binary_root: &ArtifactId) -> SourceRoots {
        self.sources_by_binary
            .get(binary_root)
            .map(|e| e.value().clone())
            .unwrap_or_default()
    }
}

impl BinaryForSourceLookup for ProjectIndex {
    fn find_binary_roots(&self, source_root: &ArtifactId) -> Arc<dyn BinaryRoots> {
        self.binaries_by_source
            .entry(source_root.clone())
            .or_default()
            .clone()
    }
}
