//! JDK discovery.
//!
//! Locates a modular JDK (9+) from:
//! - JAVA_HOME environment variable
//! - macOS java_home tool
//! - Common installation paths
//! - SDKMAN
//!
//! and lists its platform modules, which become `jrt:` roots.

use crate::error::{JavaError, Result};
use modscope_api::ArtifactId;
use ristretto_jimage::Image;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static VERSION_IN_PATH: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"jdk-?(\d+(?:\.\d+)*)").unwrap());

/// A modular JDK installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdkInstall {
    pub home: PathBuf,
    pub version: Option<String>,
}

impl JdkInstall {
    /// `home` if it looks like a modular JDK: a `lib/modules` runtime image
    /// or a `jmods` directory.
    pub fn from_home(home: &Path) -> Option<Self> {
        if !home.join("lib/modules").is_file() && !home.join("jmods").is_dir() {
            return None;
        }
        Some(Self {
            home: home.to_path_buf(),
            version: detect_jdk_version(home),
        })
    }

    /// Platform module names, sorted.
    ///
    /// Read from the `MODULES` line of the `release` file when present,
    /// otherwise from `jmods/*.jmod`, otherwise from the runtime image.
    pub fn modules(&self) -> Result<Vec<String>> {
        if let Some(modules) = self.modules_from_release() {
            return Ok(modules);
        }
        if let Some(modules) = self.modules_from_jmods() {
            return Ok(modules);
        }
        self.modules_from_image()
    }

    /// `jrt:` roots of every platform module.
    pub fn platform_roots(&self) -> Result<Vec<ArtifactId>> {
        self.modules()?
            .iter()
            .map(|module| {
                ArtifactId::platform(&self.home, module)
                    .map_err(|e| JavaError::Image(e.to_string()))
            })
            .collect()
    }

    fn modules_from_release(&self) -> Option<Vec<String>> {
        let content = std::fs::read_to_string(self.home.join("release")).ok()?;
        let line = content.lines().find(|l| l.starts_with("MODULES="))?;
        let modules: BTreeSet<String> = line
            .trim_start_matches("MODULES=")
            .trim_matches('"')
            .split_whitespace()
            .map(str::to_string)
            .collect();
        (!modules.is_empty()).then(|| modules.into_iter().collect())
    }

    fn modules_from_jmods(&self) -> Option<Vec<String>> {
        let entries = std::fs::read_dir(self.home.join("jmods")).ok()?;
        let modules: BTreeSet<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("jmod"))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        (!modules.is_empty()).then(|| modules.into_iter().collect())
    }

    fn modules_from_image(&self) -> Result<Vec<String>> {
        let image = Image::from_file(&self.home.join("lib/modules"))
            .map_err(|e| JavaError::Image(e.to_string()))?;
        let mut modules = BTreeSet::new();
        for resource in image.iter().flatten() {
            if resource.base() != "module-info" || resource.extension() != "class" {
                continue;
            }
            let name = resource.name();
            if let Some(module) = name.trim_start_matches('/').split('/').next() {
                if !module.is_empty() {
                    modules.insert(module.to_string());
                }
            }
        }
        Ok(modules.into_iter().collect())
    }
}

/// JDK discoverer.
#[derive(Debug, Default, Clone)]
pub struct JdkDiscoverer {
    /// Checked before every other location when set.
    explicit_home: Option<PathBuf>,
}

impl JdkDiscoverer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            explicit_home: Some(home.into()),
        }
    }

    pub fn discover(&self) -> Option<JdkInstall> {
        if let Some(home) = &self.explicit_home {
            return JdkInstall::from_home(home);
        }

        // 1. Check JAVA_HOME
        if let Ok(java_home) = std::env::var("JAVA_HOME") {
            if let Some(jdk) = JdkInstall::from_home(Path::new(&java_home)) {
                return Some(jdk);
            }
        }

        // 2. macOS specific: Use java_home tool
        #[cfg(target_os = "macos")]
        if let Ok(output) = std::process::Command::new("/usr/libexec/java_home").output() {
            if output.status.success() {
                let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if let Some(jdk) = JdkInstall::from_home(Path::new(&path_str)) {
                    return Some(jdk);
                }
            }
        }

        // 3. Search common installation paths
        Self::search_roots()
            .iter()
            .filter(|root| root.exists())
            .find_map(|root| Self::scan(root))
    }

    fn search_roots() -> Vec<PathBuf> {
        let mut search_roots = Vec::new();

        #[cfg(target_os = "macos")]
        {
            search_roots.push(PathBuf::from("/Library/Java/JavaVirtualMachines/"));
            search_roots.push(PathBuf::from("/opt/homebrew/opt/openjdk/"));
            search_roots.push(PathBuf::from("/usr/local/opt/openjdk/"));
        }
        #[cfg(target_os = "linux")]
        {
            search_roots.push(PathBuf::from("/usr/lib/jvm/"));
        }
        #[cfg(target_os = "windows")]
        {
            search_roots.push(PathBuf::from("C:\\Program Files\\Java\\"));
        }

        // SDKMAN
        if let Some(mut sdkman) = dirs::home_dir() {
            sdkman.push(".sdkman/candidates/java/");
            search_roots.push(sdkman);
        }
        search_roots
    }

    /// `root` itself, or the first JDK directly below it.
    fn scan(root: &Path) -> Option<JdkInstall> {
        if let Some(jdk) = JdkInstall::from_home(root) {
            return Some(jdk);
        }
        let mut candidates: Vec<PathBuf> = std::fs::read_dir(root)
            .ok()?
            .flatten()
            .map(|entry| entry.path())
            .collect();
        candidates.sort();
        candidates.into_iter().find_map(|mut sdk_path| {
            if cfg!(target_os = "macos") && sdk_path.join("Contents/Home").exists() {
                sdk_path = sdk_path.join("Contents/Home");
            }
            JdkInstall::from_home(&sdk_path)
        })
    }
}

fn detect_jdk_version(jdk_root: &Path) -> Option<String> {
    // Try to read release file
    if let Ok(content) = std::fs::read_to_string(jdk_root.join("release")) {
        for line in content.lines() {
            if let Some(version) = line.strip_prefix("JAVA_VERSION=") {
                return Some(version.trim_matches('"').to_string());
            }
        }
    }

    // Fallback: try to extract from path
    let path_str = jdk_root.to_string_lossy();
    VERSION_IN_PATH
        .captures(&path_str)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_file_lists_modules() {
        let temp = tempfile::tempdir().unwrap();
        let home = temp.path();
        std::fs::create_dir_all(home.join("lib")).unwrap();
        std::fs::File::create(home.join("lib/modules")).unwrap();
        std::fs::write(
            home.join("release"),
            "JAVA_VERSION=\"21.0.2\"\nMODULES=\"java.base java.sql java.logging\"\n",
        )
        .unwrap();

        let jdk = JdkDiscoverer::with_home(home).discover().unwrap();
        assert_eq!(jdk.version.as_deref(), Some("21.0.2"));
        assert_eq!(
            jdk.modules().unwrap(),
            vec!["java.base", "java.logging", "java.sql"]
        );
        let roots = jdk.platform_roots().unwrap();
        assert!(roots.iter().all(ArtifactId::is_platform));
        assert!(roots[0].as_str().ends_with("/!/modules/java.base/"));
    }

    #[test]
    fn test_jmods_list_modules() {
        let temp = tempfile::tempdir().unwrap();
        let home = temp.path().join("jdk-17.0.1");
        std::fs::create_dir_all(home.join("jmods")).unwrap();
        for name in ["java.base.jmod", "java.desktop.jmod", "notes.txt"] {
            std::fs::File::create(home.join("jmods").join(name)).unwrap();
        }

        let jdk = JdkInstall::from_home(&home).unwrap();
        assert_eq!(jdk.version.as_deref(), Some("17.0.1"));
        assert_eq!(jdk.modules().unwrap(), vec!["java.base", "java.desktop"]);
    }

    #[test]
    fn test_non_modular_home_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let rt_jar = temp.path().join("jre/lib/rt.jar");
        std::fs::create_dir_all(rt_jar.parent().unwrap()).unwrap();
        std::fs::File::create(&rt_jar).unwrap();

        assert!(JdkInstall::from_home(temp.path()).is_none());
        assert!(JdkDiscoverer::with_home(temp.path()).discover().is_none());
    }

    #[test]
    fn test_scan_finds_nested_jdk() {
        let temp = tempfile::tempdir().unwrap();
        let home = temp.path().join("temurin-21");
        std::fs::create_dir_all(home.join("jmods")).unwrap();
        std::fs::File::create(home.join("jmods/java.base.jmod")).unwrap();

        assert_eq!(JdkDiscoverer::scan(temp.path()).unwrap().home, home);
    }
}
