use crate::Settings;
use crate::output::{self, RootRow};
use std::path::PathBuf;

pub fn run(
    settings: &Settings,
    java_home: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(jdk) = modscope_runtime::discover_jdk(java_home) else {
        return Err("No modular JDK found; set JAVA_HOME or pass --java-home".into());
    };
    tracing::info!(
        "Using JDK {} at {}",
        jdk.version.as_deref().unwrap_or("?"),
        jdk.home.display()
    );

    let runtime = modscope_runtime::build_default_resolver(settings.layout.as_ref())?;
    let rows: Vec<RootRow> = jdk
        .platform_roots()?
        .iter()
        .map(|root| RootRow::resolve(&runtime.names, root, settings.allow_source_fallback))
        .collect();
    output::print(rows, settings.json)
}
