use modscope_api::ArtifactId;
use modscope_core::ModuleNames;
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct RootRow {
    #[tabled(rename = "Root")]
    pub root: String,
    #[tabled(skip)]
    pub module: Option<String>,
    #[tabled(rename = "Module")]
    #[serde(skip)]
    pub shown: String,
    #[tabled(rename = "Watch")]
    pub watch: String,
}

impl RootRow {
    pub fn resolve(names: &ModuleNames, root: &ArtifactId, allow_source_fallback: bool) -> Self {
        let module = names.resolve_module_name(root, allow_source_fallback);
        let watch = match names.store().get(root) {
            Some(line) => format!("{:?}", line.kind()),
            None => "uncached".to_string(),
        };
        Self {
            root: root.to_string(),
            shown: module.clone().unwrap_or_else(|| "-".to_string()),
            module,
            watch,
        }
    }
}

pub fn print<T: Serialize + Tabled>(
    rows: Vec<T>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if rows.is_empty() {
        println!("Nothing to show.");
    } else {
        println!("{}", Table::new(rows));
    }
    Ok(())
}
