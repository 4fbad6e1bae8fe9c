//! Textual module descriptors (`module-info.java`).

use crate::error::{JavaError, Result};
use modscope_api::{DescriptorParser, FileRef, RootMapper};
use std::sync::Arc;
use tree_sitter::{Node, Parser};

pub struct ModuleInfoParser {
    language: tree_sitter::Language,
    roots: Arc<dyn RootMapper>,
}

impl ModuleInfoParser {
    pub fn new(roots: Arc<dyn RootMapper>) -> Self {
        Self {
            language: tree_sitter_java::LANGUAGE.into(),
            roots,
        }
    }

    /// Module name declared in `source`, `None` if there is no module
    /// declaration.
    pub fn parse_source(&self, source: &str) -> Result<Option<String>> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| JavaError::Parser(e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| JavaError::Parser("Failed to parse module-info.java".to_string()))?;

        let root = tree.root_node();
        let mut cursor = root.walk();
        let declaration = root
            .named_children(&mut cursor)
            .find(|node| node.kind() == "module_declaration");
        let Some(name) = declaration.and_then(|d| d.child_by_field_name("name")) else {
            return Ok(None);
        };

        let mut segments = Vec::new();
        collect_identifiers(name, source.as_bytes(), &mut segments);
        if segments.is_empty() {
            return Ok(None);
        }
        Ok(Some(segments.join(".")))
    }
}

/// Identifiers of a possibly scoped name, in source order. Comments and
/// whitespace between the segments are dropped.
fn collect_identifiers<'a>(node: Node, source: &'a [u8], out: &mut Vec<&'a str>) {
    if node.kind() == "identifier" {
        if let Ok(text) = node.utf8_text(source) {
            out.push(text);
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_identifiers(child, source, out);
    }
}

impl DescriptorParser for ModuleInfoParser {
    fn parse_module_name(&self, module_info: &FileRef) -> Option<String> {
        let bytes = match self.roots.read(module_info) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", module_info.location, e);
                return None;
            }
        };
        match self.parse_source(&String::from_utf8_lossy(&bytes)) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("Cannot parse {}: {}", module_info.location, e);
                None
            }
        }
    }
}
