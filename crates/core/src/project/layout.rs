//! Project layout file.
//!
//! ```json
//! {
//!   "projects": [
//!     {
//!       "name": "app",
//!       "source_roots": ["app/src/main/java"],
//!       "binary_roots": ["app/build/libs/app-1.0.jar"],
//!       "class_folder": "app/build/classes/java/main",
//!       "prefer_sources": true,
//!       "indexed": true,
//!       "module_name": "com.example.app"
//!     }
//!   ]
//! }
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use crate::error::{ModscopeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const LAYOUT_FILE_NAME: &str = "modscope.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectLayout {
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub source_roots: Vec<PathBuf>,
    #[serde(default)]
    pub binary_roots: Vec<PathBuf>,
    #[serde(default)]
    pub class_folder: Option<PathBuf>,
    #[serde(default = "default_prefer_sources")]
    pub prefer_sources: bool,
    /// Whether the source roots count as fully indexed.
    #[serde(default)]
    pub indexed: bool,
    /// Module name recorded for the first source root while indexing.
    #[serde(default)]
    pub module_name: Option<String>,
}

fn default_prefer_sources() -> bool {
    true
}

impl ProjectLayout {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let base = std::fs::canonicalize(&base).unwrap_or(base);
        Self::from_json(&content, &base)
    }

    pub fn from_json(content: &str, base_dir: &Path) -> Result<Self> {
        let mut layout: ProjectLayout = serde_json::from_str(content)?;
        for project in &mut layout.projects {
            if project.source_roots.is_empty() {
                return Err(ModscopeError::Layout(format!(
                    "project {} has no source roots",
                    project.name.as_deref().unwrap_or("<unnamed>")
                )));
            }
            project.absolutize(base_dir);
        }
        Ok(layout)
    }

    /// Look for `modscope.json` in `dir` and its ancestors.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        dir.ancestors()
            .map(|d| d.join(LAYOUT_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }
}

impl ProjectEntry {
    fn absolutize(&mut self, base_dir: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base_dir.join(&*p);
            }
        };
        self.source_roots.iter_mut().for_each(resolve);
        self.binary_roots.iter_mut().for_each(resolve);
        if let Some(class_folder) = &mut self.class_folder {
            resolve(class_folder);
        }
    }
}
