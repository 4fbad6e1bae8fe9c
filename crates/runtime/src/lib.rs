use modscope_api::{ChangeWatch, ModuleNameService, RootMapper};
use modscope_core::cache::CacheStore;
use modscope_core::project::{ProjectIndex, ProjectLayout};
use modscope_core::watch::{ChangeHub, FsWatcher};
use modscope_core::{Collaborators, ModuleNames};
use modscope_java::{
    ClassFileDescriptorReader, JarFileSystem, JarManifestReader, JdkDiscoverer, JdkInstall,
    ModuleInfoParser,
};
use std::path::PathBuf;
use std::sync::Arc;

/// A resolver together with the services callers feed.
pub struct ResolverRuntime {
    pub names: Arc<ModuleNames>,
    pub index: Arc<ProjectIndex>,
    pub hub: Arc<ChangeHub>,
}

impl ResolverRuntime {
    pub fn service(&self) -> Arc<dyn ModuleNameService> {
        self.names.clone()
    }
}

/// Bootstraps a resolver over the local file system with the Java
/// collaborators. Change events reach it only through `hub.dispatch`.
pub fn build_default_resolver(
    layout: Option<&ProjectLayout>,
) -> modscope_core::Result<ResolverRuntime> {
    assemble(layout, Arc::new(ChangeHub::new()))
}

/// Like [`build_default_resolver`], with an OS watcher mirroring every
/// subscription. Start the returned watcher with [`FsWatcher::spawn_pump`].
pub fn build_watching_resolver(
    layout: Option<&ProjectLayout>,
) -> modscope_core::Result<(ResolverRuntime, FsWatcher)> {
    let watcher = FsWatcher::new()?;
    let hub = Arc::new(ChangeHub::with_backend(watcher.backend()));
    Ok((assemble(layout, hub)?, watcher))
}

fn assemble(
    layout: Option<&ProjectLayout>,
    hub: Arc<ChangeHub>,
) -> modscope_core::Result<ResolverRuntime> {
    let index = Arc::new(match layout {
        Some(layout) => ProjectIndex::from_layout(layout)?,
        None => ProjectIndex::new(),
    });
    let roots: Arc<dyn RootMapper> = Arc::new(JarFileSystem::new());
    let watch: Arc<dyn ChangeWatch> = hub.clone();

    let collaborators = Collaborators {
        roots: roots.clone(),
        index: index.clone(),
        source_for_binary: index.clone(),
        binary_for_source: index.clone(),
        descriptor_reader: Arc::new(ClassFileDescriptorReader::new(roots.clone())),
        descriptor_parser: Arc::new(ModuleInfoParser::new(roots.clone())),
        manifest_reader: Arc::new(JarManifestReader::new(roots)),
        watch,
    };
    tracing::debug!(
        "Resolver assembled with {} layout projects",
        layout.map_or(0, |l| l.projects.len())
    );

    Ok(ResolverRuntime {
        names: Arc::new(ModuleNames::new(Arc::new(CacheStore::new()), collaborators)),
        index,
        hub,
    })
}

/// Locate a JDK, preferring `java_home` when given.
pub fn discover_jdk(java_home: Option<PathBuf>) -> Option<JdkInstall> {
    match java_home {
        Some(home) => JdkDiscoverer::with_home(home).discover(),
        None => JdkDiscoverer::new().discover(),
    }
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(modscope_core::logging::init_logging(component, to_stderr))
}
