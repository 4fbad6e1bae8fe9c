pub mod cache;
pub mod descriptor;
pub mod error;
pub mod index;
pub mod models;
pub mod watch;

// Re-export commonly used types
pub use cache::CacheStats;
pub use descriptor::{DescriptorParser, DescriptorReader, ManifestReader, RootMapper};
pub use error::{ApiError, ApiResult};
pub use index::{
    BinaryForSourceLookup, BinaryRoots, IndexMapping, SourceForBinaryLookup, SourceRoots,
};
pub use models::*;
pub use watch::{ChangeListener, ChangeWatch, FileChangeListener, ListenerId};

/// Public surface of a module name resolver.
/// Both operations are safe to call from any number of threads.
pub trait ModuleNameService: Send + Sync {
    /// Resolve the module name of a compilation root.
    ///
    /// `None` means the root is not a named module, not even an automatic one.
    fn resolve_module_name(&self, root: &ArtifactId, allow_source_fallback: bool)
    -> Option<String>;

    /// Drop the cached name of a root; a no-op for roots never resolved.
    fn invalidate(&self, root: &ArtifactId);

    /// Get cache statistics
    fn stats(&self) -> CacheStats;
}
