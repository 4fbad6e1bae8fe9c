//! Jar manifest main section.

use modscope_api::{FileRef, ManifestReader, RootMapper};
use std::io;
use std::sync::Arc;

/// Main attributes of a `META-INF/MANIFEST.MF`. Per-entry sections are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    main: Vec<(String, String)>,
}

impl Manifest {
    /// Lenient parse: lines without a `:` are skipped, a line starting with
    /// one space continues the previous value, the first blank line ends
    /// the main section. A repeated attribute replaces the earlier value.
    pub fn parse(content: &str) -> Self {
        let mut main: Vec<(String, String)> = Vec::new();
        for line in content.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                if main.is_empty() {
                    continue;
                }
                break;
            }
            if let Some(continuation) = line.strip_prefix(' ') {
                if let Some((_, value)) = main.last_mut() {
                    value.push_str(continuation);
                }
                continue;
            }
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let value = value.strip_prefix(' ').unwrap_or(value);
            if let Some(pos) = main.iter().position(|(key, _)| key.eq_ignore_ascii_case(name)) {
                tracing::warn!("Duplicate manifest attribute {}", name);
                main.remove(pos);
            }
            main.push((name.to_string(), value.to_string()));
        }
        Self { main }
    }

    /// Attribute names compare case-insensitively.
    pub fn main_attribute(&self, name: &str) -> Option<&str> {
        self.main
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }
}

pub struct JarManifestReader {
    roots: Arc<dyn RootMapper>,
}

impl JarManifestReader {
    pub fn new(roots: Arc<dyn RootMapper>) -> Self {
        Self { roots }
    }
}

impl ManifestReader for JarManifestReader {
    fn read_attribute(&self, manifest: &FileRef, name: &str) -> io::Result<Option<String>> {
        let bytes = self.roots.read(manifest)?;
        let manifest = Manifest::parse(&String::from_utf8_lossy(&bytes));
        Ok(manifest.main_attribute(name).map(str::to_string))
    }
}
