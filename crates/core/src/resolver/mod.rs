//! Module name resolution.
//!
//! Strategies are tried in a fixed order and the first one that produces a
//! cache line wins:
//! 1. cached line that is still valid
//! 2. platform module root (`jrt:`)
//! 3. class folder of an indexed source root
//! 4. binary whose project prefers its sources
//! 5. archive: `module-info.class`, then `Automatic-Module-Name`, then a
//!    name derived from the file name
//! 6. folder holding a `module-info.class`
//!
//! A root for which nothing is found is not cached, so a later call retries.

mod project;

use crate::cache::{CacheLine, CacheRead, CacheStore};
use crate::naming::derive_automatic_name;
use modscope_api::descriptor::{ATTR_AUTOMATIC_MODULE_NAME, MANIFEST_PATH, MODULE_INFO_CLASS};
use modscope_api::{
    ArtifactId, BinaryForSourceLookup, CacheStats, ChangeWatch, DescriptorParser,
    DescriptorReader, FileRef, IndexMapping, ManifestReader, ModuleNameService, RootMapper,
    SourceForBinaryLookup, strip_extension,
};
use std::sync::Arc;
use tracing::debug;

/// External services the resolver consults.
#[derive(Clone)]
pub struct Collaborators {
    pub roots: Arc<dyn RootMapper>,
    pub index: Arc<dyn IndexMapping>,
    pub source_for_binary: Arc<dyn SourceForBinaryLookup>,
    pub binary_for_source: Arc<dyn BinaryForSourceLookup>,
    pub descriptor_reader: Arc<dyn DescriptorReader>,
    pub descriptor_parser: Arc<dyn DescriptorParser>,
    pub manifest_reader: Arc<dyn ManifestReader>,
    pub watch: Arc<dyn ChangeWatch>,
}

/// Computes and caches module names of compilation roots.
pub struct ModuleNames {
    store: Arc<CacheStore>,
    collaborators: Collaborators,
}

impl ModuleNames {
    pub fn new(store: Arc<CacheStore>, collaborators: Collaborators) -> Self {
        Self {
            store,
            collaborators,
        }
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    pub fn resolve_module_name(
        &self,
        root: &ArtifactId,
        allow_source_fallback: bool,
    ) -> Option<String> {
        if let Some(line) = self.store.get(root) {
            if let CacheRead::Valid(value) = line.read() {
                return value.map(str::to_string);
            }
        }
        debug!("No cache for: {}", root);

        if root.is_platform() {
            return self.register(root, CacheLine::plain(root.clone(), platform_module_name(root)));
        }

        let index = &self.collaborators.index;
        if let Some(source_root) = index.source_root_for_class_folder(root) {
            let line = self.project_module_name(
                root,
                std::slice::from_ref(&source_root),
                allow_source_fallback,
            );
            return self.register(root, line);
        }

        let sources = self.collaborators.source_for_binary.find_source_roots(root);
        if sources.prefer_sources {
            let line = self.project_module_name(root, &sources.roots, allow_source_fallback);
            if line.value_unchecked().is_some() {
                return self.register(root, line);
            }
            // Unpublished: drop its subscription now instead of on the next event.
            line.invalidate();
        }

        if root.is_archive() {
            self.archive_module_name(root)
        } else {
            self.folder_module_name(root)
        }
    }

    /// Invalidate the cached name of `root`; a no-op if none is cached.
    pub fn reset(&self, root: &ArtifactId) {
        self.store.invalidate_key(root);
    }

    /// Declared name of a `module-info.java`.
    pub fn parse_module_name(&self, module_info: &FileRef) -> Option<String> {
        self.collaborators.descriptor_parser.parse_module_name(module_info)
    }

    fn register(&self, root: &ArtifactId, line: Arc<CacheLine>) -> Option<String> {
        let value = line.value_unchecked().map(str::to_string);
        self.store.put(root.clone(), line);
        value
    }

    fn archive_module_name(&self, root: &ArtifactId) -> Option<String> {
        let mapper = &self.collaborators.roots;
        let watch = &self.collaborators.watch;
        let archive_root = mapper.find_root(root)?;
        let archive = mapper.archive_file(&archive_root);
        let archive_path = archive.as_ref().and_then(|a| a.path.clone());

        if let Some(module_info) = mapper.find_child(&archive_root, MODULE_INFO_CLASS) {
            match self.collaborators.descriptor_reader.read_module_name(&module_info) {
                Ok(name) => {
                    let name = non_empty(name);
                    let line = match archive_path {
                        Some(path) => CacheLine::watching_path(root.clone(), name, watch, path),
                        None => CacheLine::watching_entry(root.clone(), name, watch, module_info),
                    };
                    return self.register(root, line);
                }
                // Same as javac: treat the archive as an automatic module.
                Err(e) => debug!("Unreadable {} in {}: {}", MODULE_INFO_CLASS, root, e),
            }
        }

        if let Some(manifest) = mapper.find_child(&archive_root, MANIFEST_PATH) {
            match self
                .collaborators
                .manifest_reader
                .read_attribute(&manifest, ATTR_AUTOMATIC_MODULE_NAME)
            {
                Ok(Some(name)) if !name.is_empty() => {
                    let line = match archive_path {
                        Some(path) => {
                            CacheLine::watching_path(root.clone(), Some(name), watch, path)
                        }
                        None => CacheLine::watching_entry(
                            root.clone(),
                            Some(name),
                            watch,
                            archive.clone().unwrap_or(manifest),
                        ),
                    };
                    return self.register(root, line);
                }
                Ok(_) => {}
                Err(e) => debug!("Unreadable manifest in {}: {}", root, e),
            }
        }

        let archive = archive?;
        let name = archive
            .name()
            .and_then(|file_name| derive_automatic_name(strip_extension(&file_name)));
        let line = CacheLine::watching_file(root.clone(), name, watch, archive);
        self.register(root, line)
    }

    fn folder_module_name(&self, root: &ArtifactId) -> Option<String> {
        let mapper = &self.collaborators.roots;
        let folder = mapper.find_root(root)?;
        let module_info = mapper.find_child(&folder, MODULE_INFO_CLASS)?;
        match self.collaborators.descriptor_reader.read_module_name(&module_info) {
            Ok(name) => {
                let watch = &self.collaborators.watch;
                let line =
                    CacheLine::watching_file(root.clone(), non_empty(name), watch, module_info);
                self.register(root, line)
            }
            Err(e) => {
                debug!("Unreadable {} in {}: {}", MODULE_INFO_CLASS, root, e);
                None
            }
        }
    }
}

impl ModuleNameService for ModuleNames {
    fn resolve_module_name(
        &self,
        root: &ArtifactId,
        allow_source_fallback: bool,
    ) -> Option<String> {
        ModuleNames::resolve_module_name(self, root, allow_source_fallback)
    }

    fn invalidate(&self, root: &ArtifactId) {
        self.reset(root);
    }

    fn stats(&self) -> CacheStats {
        self.store.stats()
    }
}

/// A module name is never empty; an empty declaration names nothing.
fn non_empty(name: Option<String>) -> Option<String> {
    name.filter(|name| !name.is_empty())
}

/// `jrt:/jdk/!/modules/java.base/` -> `java.base`
fn platform_module_name(root: &ArtifactId) -> Option<String> {
    let path = root.path();
    let path = path.strip_suffix('/').unwrap_or(path);
    let name = &path[path.rfind('/').map_or(0, |idx| idx + 1)..];
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
