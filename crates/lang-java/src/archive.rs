//! Root access over plain folders and zip archives.

use crate::error::Result;
use modscope_api::{ArtifactId, FileRef, RootMapper, SCHEME_FILE, SCHEME_JAR};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use zip::ZipArchive;

/// [`RootMapper`] over the local file system. `jar:` roots are read with
/// the `zip` crate; archives nested inside archives are not opened.
#[derive(Debug, Default, Clone)]
pub struct JarFileSystem;

impl JarFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn open(archive: &Path) -> Result<ZipArchive<File>> {
        Ok(ZipArchive::new(File::open(archive)?)?)
    }

    /// Whether `entry` names a file or directory inside `archive`.
    fn has_entry(archive: &Path, entry: &str) -> Result<bool> {
        let mut zip = Self::open(archive)?;
        if entry.is_empty() {
            return Ok(true);
        }
        if zip.by_name(entry).is_ok() {
            return Ok(true);
        }
        // Directories often have no entry of their own.
        let prefix = if entry.ends_with('/') {
            entry.to_string()
        } else {
            format!("{entry}/")
        };
        Ok(zip.file_names().any(|name| name.starts_with(&prefix)))
    }

    fn read_entry(archive: &Path, entry: &str) -> Result<Vec<u8>> {
        let mut zip = Self::open(archive)?;
        let mut file = zip.by_name(entry)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl RootMapper for JarFileSystem {
    fn find_root(&self, root: &ArtifactId) -> Option<FileRef> {
        match root.scheme() {
            SCHEME_FILE => {
                let path = root.to_file_path()?;
                path.is_dir().then(|| FileRef::on_disk(root.clone(), path))
            }
            SCHEME_JAR => {
                let archive = root.archive_file_path()?;
                let entry = root.archive_entry()?;
                match Self::has_entry(&archive, entry) {
                    Ok(true) => Some(FileRef::in_archive(root.clone())),
                    Ok(false) => None,
                    Err(e) => {
                        tracing::debug!("Cannot open {}: {}", archive.display(), e);
                        None
                    }
                }
            }
            _ => None,
        }
    }

    fn find_child(&self, parent: &FileRef, relative: &str) -> Option<FileRef> {
        let location = parent.location.child(relative).ok()?;
        if let Some(dir) = &parent.path {
            let path = dir.join(relative);
            return path.exists().then(|| FileRef::on_disk(location, path));
        }
        let archive = location.archive_file_path()?;
        let entry = location.archive_entry()?;
        let mut zip = Self::open(&archive).ok()?;
        let found = zip.by_name(entry).is_ok();
        found.then(|| FileRef::in_archive(location))
    }

    fn archive_file(&self, root: &FileRef) -> Option<FileRef> {
        let path = root.location.archive_file_path()?;
        if !path.is_file() {
            return None;
        }
        let location = ArtifactId::file(&path).ok()?;
        Some(FileRef::on_disk(location, path))
    }

    fn read(&self, file: &FileRef) -> io::Result<Vec<u8>> {
        if let Some(path) = &file.path {
            return std::fs::read(path);
        }
        let archive = file
            .location
            .archive_file_path()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, file.location.to_string()))?;
        let entry = file.location.archive_entry().unwrap_or_default();
        Self::read_entry(&archive, entry).map_err(io::Error::from)
    }
}
