//! Identities of compilation roots and of the files inside them.
//!
//! A root is addressed by a URL. Three schemes matter:
//! - `file:` a plain folder (`file:///work/app/classes/`)
//! - `jar:` an archive or an entry inside one (`jar:file:///libs/a.jar!/`)
//! - `jrt:` a platform module of a JDK runtime image
//!   (`jrt:/usr/lib/jvm/jdk-21/!/modules/java.base/`)

use crate::error::{ApiError, ApiResult};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

pub const SCHEME_FILE: &str = "file";
pub const SCHEME_JAR: &str = "jar";
pub const SCHEME_JRT: &str = "jrt";

const ARCHIVE_SEPARATOR: &str = "!/";
const ARCHIVE_EXTENSIONS: &[&str] = &["jar", "zip", "jmod"];

/// Opaque, hashable key of a compilation root (or of an entry below one).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId(Url);

impl ArtifactId {
    pub fn parse(location: &str) -> ApiResult<Self> {
        Url::parse(location)
            .map(Self)
            .map_err(|e| ApiError::InvalidLocation(format!("{location}: {e}")))
    }

    /// Root of a plain folder. `path` must be absolute.
    pub fn folder(path: &Path) -> ApiResult<Self> {
        Url::from_directory_path(path)
            .map(Self)
            .map_err(|_| ApiError::InvalidLocation(path.display().to_string()))
    }

    /// A regular file addressed by its own location (not as a root).
    pub fn file(path: &Path) -> ApiResult<Self> {
        Url::from_file_path(path)
            .map(Self)
            .map_err(|_| ApiError::InvalidLocation(path.display().to_string()))
    }

    /// Root of an archive file. `path` must be absolute.
    pub fn archive(path: &Path) -> ApiResult<Self> {
        let file = Url::from_file_path(path)
            .map_err(|_| ApiError::InvalidLocation(path.display().to_string()))?;
        Self::parse(&format!("{SCHEME_JAR}:{file}{ARCHIVE_SEPARATOR}"))
    }

    /// Root of a platform module inside the JDK installed at `jdk_home`.
    pub fn platform(jdk_home: &Path, module: &str) -> ApiResult<Self> {
        let home = Url::from_directory_path(jdk_home)
            .map_err(|_| ApiError::InvalidLocation(jdk_home.display().to_string()))?;
        Self::parse(&format!(
            "{SCHEME_JRT}:{}{ARCHIVE_SEPARATOR}modules/{module}/",
            home.path()
        ))
    }

    /// Picks the archive or folder form from the file name alone.
    pub fn from_path(path: &Path) -> ApiResult<Self> {
        if has_archive_extension(path) {
            Self::archive(path)
        } else {
            Self::folder(path)
        }
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    pub fn path(&self) -> &str {
        self.0.path()
    }

    pub fn is_archive(&self) -> bool {
        self.scheme() == SCHEME_JAR
    }

    pub fn is_platform(&self) -> bool {
        self.scheme() == SCHEME_JRT
    }

    /// Location of `relative` below this root.
    pub fn child(&self, relative: &str) -> ApiResult<Self> {
        let base = self.as_str();
        let relative = relative.trim_start_matches('/');
        if base.ends_with('/') {
            Self::parse(&format!("{base}{relative}"))
        } else {
            Self::parse(&format!("{base}/{relative}"))
        }
    }

    /// `file:` URL of the archive holding this `jar:` location.
    pub fn archive_file_url(&self) -> Option<Url> {
        if !self.is_archive() {
            return None;
        }
        let (file, _) = self.path().split_once(ARCHIVE_SEPARATOR)?;
        Url::parse(file).ok()
    }

    /// Entry path inside the archive, empty for the archive root itself.
    pub fn archive_entry(&self) -> Option<&str> {
        if !self.is_archive() {
            return None;
        }
        self.path()
            .split_once(ARCHIVE_SEPARATOR)
            .map(|(_, entry)| entry)
    }

    pub fn archive_file_path(&self) -> Option<PathBuf> {
        self.archive_file_url()?.to_file_path().ok()
    }

    /// File name of the archive, extension included.
    pub fn archive_file_name(&self) -> Option<String> {
        self.archive_file_path()?
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }

    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.scheme() == SCHEME_FILE {
            self.0.to_file_path().ok()
        } else {
            None
        }
    }

    /// The on-disk file whose changes affect this location.
    pub fn backing_path(&self) -> Option<PathBuf> {
        match self.scheme() {
            SCHEME_FILE => self.to_file_path(),
            SCHEME_JAR => self.archive_file_path(),
            _ => None,
        }
    }

    /// Last non-empty path segment.
    pub fn name(&self) -> Option<String> {
        if let Some(path) = self.to_file_path() {
            return path.file_name().map(|n| n.to_string_lossy().into_owned());
        }
        let path = self.archive_entry().unwrap_or_else(|| self.path());
        path.rsplit('/')
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Url> for ArtifactId {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

pub fn has_archive_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ARCHIVE_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Strip the last extension of a file name (`a.b.jar` -> `a.b`).
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// A file or entry below a root.
///
/// `path` is set only when the entry is a real file on disk; entries inside
/// archives are addressed by `location` alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRef {
    pub location: ArtifactId,
    pub path: Option<PathBuf>,
}

impl FileRef {
    pub fn on_disk(location: ArtifactId, path: PathBuf) -> Self {
        Self {
            location,
            path: Some(path),
        }
    }

    pub fn in_archive(location: ArtifactId) -> Self {
        Self {
            location,
            path: None,
        }
    }

    pub fn name(&self) -> Option<String> {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .or_else(|| self.location.name())
    }
}
