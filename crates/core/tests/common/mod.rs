use modscope_api::{
    ArtifactId, DescriptorParser, DescriptorReader, FileRef, ManifestReader, RootMapper,
};
use modscope_core::cache::CacheStore;
use modscope_core::project::ProjectIndex;
use modscope_core::watch::ChangeHub;
use modscope_core::{Collaborators, ModuleNames};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory roots. Archive files are reported on disk unless the root was
/// added as nested.
#[derive(Default)]
#[allow(dead_code)]
pub struct FakeRoots {
    roots: Mutex<HashMap<ArtifactId, FileRef>>,
    children: Mutex<HashMap<(ArtifactId, String), FileRef>>,
    nested: Mutex<HashSet<ArtifactId>>,
    pub lookups: AtomicUsize,
}

impl RootMapper for FakeRoots {
    fn find_root(&self, root: &ArtifactId) -> Option<FileRef> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.roots.lock().unwrap().get(root).cloned()
    }

    fn find_child(&self, parent: &FileRef, relative: &str) -> Option<FileRef> {
        let key = (parent.location.clone(), relative.to_string());
        self.children.lock().unwrap().get(&key).cloned()
    }

    fn archive_file(&self, root: &FileRef) -> Option<FileRef> {
        if self.nested.lock().unwrap().contains(&root.location) {
            return None;
        }
        let path = root.location.archive_file_path()?;
        Some(FileRef::on_disk(ArtifactId::file(&path).ok()?, path))
    }

    fn read(&self, _file: &FileRef) -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "fake roots hold no bytes"))
    }
}

/// Module names keyed by descriptor location. Unknown descriptors fail to read.
#[derive(Default)]
pub struct FakeDescriptors {
    names: Mutex<HashMap<ArtifactId, Option<String>>>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeDescriptors {
    pub fn set(&self, location: &ArtifactId, name: Option<&str>) {
        self.names
            .lock()
            .unwrap()
            .insert(location.clone(), name.map(str::to_string));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DescriptorReader for FakeDescriptors {
    fn read_module_name(&self, module_info: &FileRef) -> io::Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.names
            .lock()
            .unwrap()
            .get(&module_info.location)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "broken module-info.class"))
    }
}

impl DescriptorParser for FakeDescriptors {
    fn parse_module_name(&self, module_info: &FileRef) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.names
            .lock()
            .unwrap()
            .get(&module_info.location)
            .cloned()
            .flatten()
    }
}

#[derive(Default)]
pub struct FakeManifests {
    attributes: Mutex<HashMap<ArtifactId, String>>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeManifests {
    pub fn set(&self, manifest: &ArtifactId, automatic_name: &str) {
        self.attributes
            .lock()
            .unwrap()
            .insert(manifest.clone(), automatic_name.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ManifestReader for FakeManifests {
    fn read_attribute(&self, manifest: &FileRef, _name: &str) -> io::Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.attributes.lock().unwrap().get(&manifest.location).cloned())
    }
}

#[allow(dead_code)]
pub struct Fixture {
    pub roots: Arc<FakeRoots>,
    pub classes: Arc<FakeDescriptors>,
    pub sources: Arc<FakeDescriptors>,
    pub manifests: Arc<FakeManifests>,
    pub index: Arc<ProjectIndex>,
    pub hub: Arc<ChangeHub>,
    pub names: ModuleNames,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        let roots = Arc::new(FakeRoots::default());
        let classes = Arc::new(FakeDescriptors::default());
        let sources = Arc::new(FakeDescriptors::default());
        let manifests = Arc::new(FakeManifests::default());
        let index = Arc::new(ProjectIndex::new());
        let hub = Arc::new(ChangeHub::new());
        let names = ModuleNames::new(
            Arc::new(CacheStore::new()),
            Collaborators {
                roots: roots.clone(),
                index: index.clone(),
                source_for_binary: index.clone(),
                binary_for_source: index.clone(),
                descriptor_reader: classes.clone(),
                descriptor_parser: sources.clone(),
                manifest_reader: manifests.clone(),
                watch: hub.clone(),
            },
        );
        Self {
            roots,
            classes,
            sources,
            manifests,
            index,
            hub,
            names,
        }
    }

    pub fn archive(&self, path: &str) -> ArtifactId {
        let root = ArtifactId::archive(Path::new(path)).unwrap();
        self.roots
            .roots
            .lock()
            .unwrap()
            .insert(root.clone(), FileRef::in_archive(root.clone()));
        root
    }

    /// An archive that does not exist as a file of its own.
    pub fn nested_archive(&self, path: &str) -> ArtifactId {
        let root = self.archive(path);
        self.roots.nested.lock().unwrap().insert(root.clone());
        root
    }

    pub fn folder(&self, path: &str) -> ArtifactId {
        let root = ArtifactId::folder(Path::new(path)).unwrap();
        self.roots.roots.lock().unwrap().insert(
            root.clone(),
            FileRef::on_disk(root.clone(), PathBuf::from(path)),
        );
        root
    }

    /// Add `relative` below `root`; returns its location.
    pub fn child(&self, root: &ArtifactId, relative: &str) -> ArtifactId {
        let location = root.child(relative).unwrap();
        let file = match location.to_file_path() {
            Some(path) => FileRef::on_disk(location.clone(), path),
            None => FileRef::in_archive(location.clone()),
        };
        self.roots
            .children
            .lock()
            .unwrap()
            .insert((root.clone(), relative.to_string()), file);
        location
    }

    pub fn resolve(&self, root: &ArtifactId) -> Option<String> {
        self.names.resolve_module_name(root, true)
    }
}
