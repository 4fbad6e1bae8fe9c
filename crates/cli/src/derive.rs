use crate::Settings;
use crate::output;
use modscope_api::strip_extension;
use modscope_core::naming::derive_automatic_name;
use serde::Serialize;
use tabled::Tabled;

#[derive(Serialize, Tabled)]
struct DerivedRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(skip)]
    module: Option<String>,
    #[tabled(rename = "Automatic Module")]
    #[serde(skip)]
    shown: String,
}

pub fn run(settings: &Settings, names: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let rows: Vec<DerivedRow> = names
        .iter()
        .map(|file| {
            let module = derive_automatic_name(strip_extension(file));
            DerivedRow {
                file: file.clone(),
                shown: module.clone().unwrap_or_else(|| "-".to_string()),
                module,
            }
        })
        .collect();
    output::print(rows, settings.json)
}
