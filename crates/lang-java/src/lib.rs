//! Java collaborators of the module name resolver: root access over folders
//! and archives, descriptor and manifest readers, and JDK discovery.

pub mod archive;
pub mod descriptor;
pub mod error;
pub mod jdk;
pub mod manifest;
pub mod parser;

pub use archive::JarFileSystem;
pub use descriptor::{ClassFileDescriptorReader, module_name_from_class_bytes};
pub use error::{JavaError, Result};
pub use jdk::{JdkDiscoverer, JdkInstall};
pub use manifest::{JarManifestReader, Manifest};
pub use parser::ModuleInfoParser;
