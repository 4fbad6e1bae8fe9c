use modscope_api::{ChangeWatch, RootMapper};
use modscope_core::cache::CacheStore;
use modscope_core::project::ProjectIndex;
use modscope_core::watch::ChangeHub;
use modscope_core::{Collaborators, ModuleNames};
use modscope_java::{
    ClassFileDescriptorReader, JarFileSystem, JarManifestReader, ModuleInfoParser,
};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use zip::write::SimpleFileOptions;

pub struct JavaFixture {
    pub names: ModuleNames,
    pub index: Arc<ProjectIndex>,
    pub hub: Arc<ChangeHub>,
}

impl JavaFixture {
    pub fn new() -> Self {
        let roots: Arc<dyn RootMapper> = Arc::new(JarFileSystem::new());
        let index = Arc::new(ProjectIndex::new());
        let hub = Arc::new(ChangeHub::new());
        let watch: Arc<dyn ChangeWatch> = hub.clone();
        let names = ModuleNames::new(
            Arc::new(CacheStore::new()),
            Collaborators {
                roots: roots.clone(),
                index: index.clone(),
                source_for_binary: index.clone(),
                binary_for_source: index.clone(),
                descriptor_reader: Arc::new(ClassFileDescriptorReader::new(roots.clone())),
                descriptor_parser: Arc::new(ModuleInfoParser::new(roots.clone())),
                manifest_reader: Arc::new(JarManifestReader::new(roots)),
                watch,
            },
        );
        Self { names, index, hub }
    }
}

pub fn write_jar(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, data) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

pub fn manifest(automatic_name: &str) -> Vec<u8> {
    format!("Manifest-Version: 1.0\r\nAutomatic-Module-Name: {automatic_name}\r\n\r\n").into_bytes()
}

/// Smallest class file the reader accepts as a module descriptor.
pub fn module_info_class(name: &str) -> Vec<u8> {
    fn utf8(out: &mut Vec<u8>, s: &str) {
        out.push(1);
        out.extend_from_slice(&(s.len() as u16).to_be_bytes());
        out.extend_from_slice(s.as_bytes());
    }

    let mut out = Vec::new();
    out.extend_from_slice(&[0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 53, 0, 6]);
    utf8(&mut out, "module-info");
    out.extend_from_slice(&[7, 0, 1]);
    utf8(&mut out, "Module");
    utf8(&mut out, name);
    out.extend_from_slice(&[19, 0, 4]);
    // access, this, super, interfaces, fields, methods
    out.extend_from_slice(&[0x80, 0x00, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0]);
    // one Module attribute of 16 bytes naming constant #5
    out.extend_from_slice(&[0, 1, 0, 3, 0, 0, 0, 16, 0, 5]);
    out.extend_from_slice(&[0; 14]);
    out
}
