//! Module names of roots that belong to a project with sources.

use super::{ModuleNames, non_empty};
use crate::cache::CacheLine;
use crate::naming::derive_automatic_name;
use modscope_api::descriptor::MODULE_INFO_JAVA;
use modscope_api::index::ATTR_MODULE_NAME;
use modscope_api::{ArtifactId, strip_extension};
use std::sync::Arc;
use tracing::warn;

impl ModuleNames {
    /// Name a root after its source roots.
    ///
    /// Fully indexed sources answer from the stored attribute. Otherwise
    /// `module-info.java` is parsed when fallback is allowed. A source root
    /// set without a descriptor gets a name derived from its binaries.
    pub(super) fn project_module_name(
        &self,
        root: &ArtifactId,
        source_roots: &[ArtifactId],
        allow_source_fallback: bool,
    ) -> Arc<CacheLine> {
        let Some(first) = source_roots.first() else {
            return CacheLine::plain(root.clone(), None);
        };

        let index = &self.collaborators.index;
        if source_roots.iter().all(|src| index.is_fully_indexed(src)) {
            for src in source_roots {
                match index.stored_attribute(src, ATTR_MODULE_NAME) {
                    Ok(Some(name)) if !name.is_empty() => {
                        return CacheLine::plain(root.clone(), Some(name));
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Cannot read stored module name of {}: {}", src, e),
                }
            }
            return self.automatic_project_name(root, first);
        }

        if !allow_source_fallback {
            return CacheLine::plain(root.clone(), None);
        }

        let mapper = &self.collaborators.roots;
        let descriptor = source_roots.iter().find_map(|src| {
            let folder = mapper.find_root(src)?;
            mapper.find_child(&folder, MODULE_INFO_JAVA)
        });
        match descriptor {
            Some(module_info) => {
                let name = non_empty(self.parse_module_name(&module_info));
                CacheLine::watching_file(root.clone(), name, &self.collaborators.watch, module_info)
            }
            None => self.automatic_project_name(root, first),
        }
    }

    /// Automatic name of the first archive built from `source_root`,
    /// invalidated whenever that set of binaries changes.
    fn automatic_project_name(
        &self,
        root: &ArtifactId,
        source_root: &ArtifactId,
    ) -> Arc<CacheLine> {
        let binaries = self.collaborators.binary_for_source.find_binary_roots(source_root);
        let archive_name = binaries
            .roots()
            .iter()
            .filter(|binary| binary.is_archive())
            .find_map(ArtifactId::archive_file_name);
        match archive_name {
            Some(file_name) => {
                let name = derive_automatic_name(strip_extension(&file_name));
                CacheLine::watching_binary_roots(root.clone(), name, binaries)
            }
            None => CacheLine::plain(root.clone(), None),
        }
    }
}
