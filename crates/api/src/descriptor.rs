//! Access to root contents and to the files that declare module names.

use crate::models::{ArtifactId, FileRef};
use std::io;

pub const MODULE_INFO_CLASS: &str = "module-info.class";
pub const MODULE_INFO_JAVA: &str = "module-info.java";
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
pub const ATTR_AUTOMATIC_MODULE_NAME: &str = "Automatic-Module-Name";

/// Maps root identities onto files.
pub trait RootMapper: Send + Sync {
    /// The folder or archive root behind `root`, if it exists.
    fn find_root(&self, root: &ArtifactId) -> Option<FileRef>;

    fn find_child(&self, parent: &FileRef, relative: &str) -> Option<FileRef>;

    /// The archive file containing an archive root.
    fn archive_file(&self, root: &FileRef) -> Option<FileRef>;

    fn read(&self, file: &FileRef) -> io::Result<Vec<u8>>;
}

/// Reads the module name out of a compiled `module-info.class`.
pub trait DescriptorReader: Send + Sync {
    fn read_module_name(&self, module_info: &FileRef) -> io::Result<Option<String>>;
}

/// Parses the module name out of a `module-info.java` source file.
pub trait DescriptorParser: Send + Sync {
    fn parse_module_name(&self, module_info: &FileRef) -> Option<String>;
}

/// Reads main attributes of a jar manifest.
pub trait ManifestReader: Send + Sync {
    fn read_attribute(&self, manifest: &FileRef, name: &str) -> io::Result<Option<String>>;
}
