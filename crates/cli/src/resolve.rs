use crate::output::{self, RootRow};
use crate::{Settings, parse_root};
use modscope_api::{ArtifactId, has_archive_extension};
use std::path::Path;
use walkdir::WalkDir;

pub fn run(
    settings: &Settings,
    args: &[String],
    scan: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = modscope_runtime::build_default_resolver(settings.layout.as_ref())?;

    let mut roots = Vec::new();
    for arg in args {
        if scan && Path::new(arg).is_dir() {
            roots.extend(scan_archives(Path::new(arg))?);
        } else {
            roots.push(parse_root(arg)?);
        }
    }

    let rows: Vec<RootRow> = roots
        .iter()
        .map(|root| RootRow::resolve(&runtime.names, root, settings.allow_source_fallback))
        .collect();
    tracing::info!("Resolved {} roots", rows.len());
    output::print(rows, settings.json)
}

/// Archive roots below `dir`, in path order.
pub fn scan_archives(dir: &Path) -> Result<Vec<ArtifactId>, Box<dyn std::error::Error>> {
    let mut roots = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && has_archive_extension(entry.path()) {
            let path = std::fs::canonicalize(entry.path())?;
            roots.push(ArtifactId::archive(&path)?);
        }
    }
    Ok(roots)
}
