//! Resolution order and the value each step produces.

mod common;

use common::Fixture;
use modscope_api::descriptor::{MANIFEST_PATH, MODULE_INFO_CLASS, MODULE_INFO_JAVA};
use modscope_api::index::ATTR_MODULE_NAME;
use modscope_api::{ArtifactId, ModuleNameService};
use modscope_core::cache::LineKind;
use std::path::Path;

fn line_kind(fx: &Fixture, root: &ArtifactId) -> LineKind {
    fx.names.store().get(root).unwrap().kind()
}

#[test]
fn test_platform_module_uses_last_segment() {
    let fx = Fixture::new();
    let root = ArtifactId::platform(Path::new("/opt/jdk-21"), "java.sql").unwrap();

    assert_eq!(fx.resolve(&root).as_deref(), Some("java.sql"));
    assert_eq!(line_kind(&fx, &root), LineKind::Unsubscribed);
    assert_eq!(fx.roots.lookups.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[test]
fn test_compiled_descriptor_wins_over_manifest() {
    let fx = Fixture::new();
    let jar = fx.archive("/libs/foo-1.0.jar");
    let module_info = fx.child(&jar, MODULE_INFO_CLASS);
    let manifest = fx.child(&jar, MANIFEST_PATH);
    fx.classes.set(&module_info, Some("com.foo"));
    fx.manifests.set(&manifest, "com.foo.auto");

    assert_eq!(fx.resolve(&jar).as_deref(), Some("com.foo"));
    assert_eq!(fx.manifests.calls(), 0);
    assert_eq!(line_kind(&fx, &jar), LineKind::PathWatch);
    assert_eq!(
        fx.hub.watched_paths(),
        vec![Path::new("/libs/foo-1.0.jar").to_path_buf()]
    );
}

#[test]
fn test_unreadable_descriptor_falls_back_to_manifest() {
    let fx = Fixture::new();
    let jar = fx.archive("/libs/acme.jar");
    fx.child(&jar, MODULE_INFO_CLASS);
    let manifest = fx.child(&jar, MANIFEST_PATH);
    fx.manifests.set(&manifest, "Org_Acme.Util");

    // The manifest value is returned as written, without normalization.
    assert_eq!(fx.resolve(&jar).as_deref(), Some("Org_Acme.Util"));
    assert_eq!(fx.classes.calls(), 1);
}

#[test]
fn test_archive_name_is_derived_from_file_name() {
    let fx = Fixture::new();
    let jar = fx.archive("/libs/commons-lang3-3.9.jar");
    fx.child(&jar, MANIFEST_PATH);

    assert_eq!(fx.resolve(&jar).as_deref(), Some("commons.lang3"));
    assert_eq!(fx.manifests.calls(), 1);
    assert_eq!(line_kind(&fx, &jar), LineKind::PathWatch);
}

#[test]
fn test_empty_manifest_name_is_derived_instead() {
    let fx = Fixture::new();
    let jar = fx.archive("/libs/acme-util-1.0.jar");
    let manifest = fx.child(&jar, MANIFEST_PATH);
    fx.manifests.set(&manifest, "");

    assert_eq!(fx.resolve(&jar).as_deref(), Some("acme.util"));
    assert_eq!(line_kind(&fx, &jar), LineKind::PathWatch);
}

#[test]
fn test_empty_descriptor_name_is_absent() {
    let fx = Fixture::new();
    let jar = fx.archive("/libs/foo.jar");
    let module_info = fx.child(&jar, MODULE_INFO_CLASS);
    fx.classes.set(&module_info, Some(""));

    assert_eq!(fx.resolve(&jar), None);
    assert_eq!(fx.names.store().get(&jar).unwrap().value_unchecked(), None);
}

#[test]
fn test_underivable_archive_name_is_cached_as_absent() {
    let fx = Fixture::new();
    let jar = fx.archive("/libs/---.jar");

    assert_eq!(fx.resolve(&jar), None);
    assert_eq!(fx.names.stats().total_entries, 1);
    assert_eq!(fx.resolve(&jar), None);
    assert_eq!(fx.roots.lookups.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[test]
fn test_unknown_root_is_not_cached() {
    let fx = Fixture::new();
    let jar = ArtifactId::archive(Path::new("/libs/missing.jar")).unwrap();
    let folder = fx.folder("/work/plain");

    assert_eq!(fx.resolve(&jar), None);
    assert_eq!(fx.resolve(&folder), None);
    assert_eq!(fx.names.stats().total_entries, 0);
}

#[test]
fn test_folder_with_compiled_descriptor() {
    let fx = Fixture::new();
    let folder = fx.folder("/work/classes");
    let module_info = fx.child(&folder, MODULE_INFO_CLASS);
    fx.classes.set(&module_info, Some("com.example"));

    assert_eq!(fx.resolve(&folder).as_deref(), Some("com.example"));
    assert_eq!(
        fx.hub.watched_paths(),
        vec![Path::new("/work/classes/module-info.class").to_path_buf()]
    );
}

#[test]
fn test_folder_with_unreadable_descriptor_is_not_cached() {
    let fx = Fixture::new();
    let folder = fx.folder("/work/classes");
    fx.child(&folder, MODULE_INFO_CLASS);

    assert_eq!(fx.resolve(&folder), None);
    assert_eq!(fx.names.stats().total_entries, 0);
}

#[test]
fn test_nested_archive_watches_descriptor_entry() {
    let fx = Fixture::new();
    let jar = fx.nested_archive("/libs/outer.jar");
    let module_info = fx.child(&jar, MODULE_INFO_CLASS);
    fx.classes.set(&module_info, Some("com.inner"));

    assert_eq!(fx.resolve(&jar).as_deref(), Some("com.inner"));
    assert_eq!(line_kind(&fx, &jar), LineKind::VirtualFileWatch);
    assert_eq!(fx.hub.entry_listener_count(), 1);
}

#[test]
fn test_class_folder_uses_indexed_attribute() {
    let fx = Fixture::new();
    let src = fx.folder("/work/src");
    let classes = ArtifactId::folder(Path::new("/work/classes")).unwrap();
    fx.index.register_class_folder(classes.clone(), src.clone());
    fx.index.mark_indexed(src.clone());
    fx.index
        .set_attribute(&src, ATTR_MODULE_NAME, Some("com.indexed".to_string()));

    assert_eq!(fx.resolve(&classes).as_deref(), Some("com.indexed"));
    assert_eq!(line_kind(&fx, &classes), LineKind::Unsubscribed);
    assert_eq!(fx.sources.calls(), 0);
}

#[test]
fn test_class_folder_parses_source_descriptor() {
    let fx = Fixture::new();
    let src = fx.folder("/work/src");
    let module_info = fx.child(&src, MODULE_INFO_JAVA);
    fx.sources.set(&module_info, Some("com.parsed"));
    let classes = ArtifactId::folder(Path::new("/work/classes")).unwrap();
    fx.index.register_class_folder(classes.clone(), src.clone());

    assert_eq!(fx.resolve(&classes).as_deref(), Some("com.parsed"));
    assert_eq!(line_kind(&fx, &classes), LineKind::PathWatch);
}

#[test]
fn test_class_folder_without_fallback_is_absent() {
    let fx = Fixture::new();
    let src = fx.folder("/work/src");
    let module_info = fx.child(&src, MODULE_INFO_JAVA);
    fx.sources.set(&module_info, Some("com.parsed"));
    let classes = ArtifactId::folder(Path::new("/work/classes")).unwrap();
    fx.index.register_class_folder(classes.clone(), src.clone());

    assert_eq!(fx.names.resolve_module_name(&classes, false), None);
    assert_eq!(fx.sources.calls(), 0);
    // An absent answer from the class folder step is still cached.
    assert_eq!(fx.names.stats().total_entries, 1);
}

#[test]
fn test_indexed_sources_without_attribute_derive_from_binaries() {
    let fx = Fixture::new();
    let src = fx.folder("/work/src");
    let jar = ArtifactId::archive(Path::new("/work/out/app-core-2.1.jar")).unwrap();
    let classes = ArtifactId::folder(Path::new("/work/classes")).unwrap();
    fx.index.register_project(&[src.clone()], &[jar], true);
    fx.index.register_class_folder(classes.clone(), src.clone());
    fx.index.mark_indexed(src);

    assert_eq!(fx.resolve(&classes).as_deref(), Some("app.core"));
    assert_eq!(line_kind(&fx, &classes), LineKind::DerivedRootsWatch);
}

#[test]
fn test_empty_indexed_attribute_is_skipped() {
    let fx = Fixture::new();
    let src = fx.folder("/work/src");
    let classes = ArtifactId::folder(Path::new("/work/classes")).unwrap();
    fx.index.register_class_folder(classes.clone(), src.clone());
    fx.index.mark_indexed(src.clone());
    fx.index.set_attribute(&src, ATTR_MODULE_NAME, Some(String::new()));

    // No binaries to derive from either.
    assert_eq!(fx.resolve(&classes), None);
    assert_eq!(line_kind(&fx, &classes), LineKind::Unsubscribed);
}

#[test]
fn test_prefer_sources_binary_uses_project_name() {
    let fx = Fixture::new();
    let src = fx.folder("/work/src");
    let module_info = fx.child(&src, MODULE_INFO_JAVA);
    fx.sources.set(&module_info, Some("com.app"));
    let jar = fx.archive("/work/out/app.jar");
    let compiled = fx.child(&jar, MODULE_INFO_CLASS);
    fx.classes.set(&compiled, Some("com.app.stale"));
    fx.index.register_project(&[src], &[jar.clone()], true);

    assert_eq!(fx.resolve(&jar).as_deref(), Some("com.app"));
    assert_eq!(fx.classes.calls(), 0);
}

#[test]
fn test_absent_project_name_falls_through_to_archive() {
    let fx = Fixture::new();
    let src = fx.folder("/work/src");
    let jar = fx.archive("/work/out/app.jar");
    let compiled = fx.child(&jar, MODULE_INFO_CLASS);
    fx.classes.set(&compiled, Some("com.app"));
    fx.index.register_project(&[src], &[jar.clone()], true);

    // No fallback: the project step yields nothing and the archive decides.
    assert_eq!(fx.names.resolve_module_name(&jar, false).as_deref(), Some("com.app"));
    assert_eq!(line_kind(&fx, &jar), LineKind::PathWatch);
}

#[test]
fn test_binary_without_prefer_sources_ignores_project() {
    let fx = Fixture::new();
    let src = fx.folder("/work/src");
    let module_info = fx.child(&src, MODULE_INFO_JAVA);
    fx.sources.set(&module_info, Some("com.app"));
    let jar = fx.archive("/repo/app-1.0.jar");
    fx.index.register_project(&[src], &[jar.clone()], false);

    assert_eq!(fx.resolve(&jar).as_deref(), Some("app"));
    assert_eq!(fx.sources.calls(), 0);
}

#[test]
fn test_service_trait_reports_stats() {
    let fx = Fixture::new();
    let service: &dyn ModuleNameService = &fx.names;
    let jar = fx.archive("/libs/guava-31.1-jre.jar");

    assert_eq!(service.resolve_module_name(&jar, true).as_deref(), Some("guava"));
    service.invalidate(&jar);
    let stats = service.stats();
    assert_eq!(stats.total_entries, 1);
    assert_eq!(stats.stale_entries, 1);
    assert_eq!(stats.live_entries(), 0);
}
