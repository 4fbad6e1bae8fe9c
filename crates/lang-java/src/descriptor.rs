//! Compiled module descriptors (`module-info.class`).

use crate::error::{JavaError, Result};
use modscope_api::{DescriptorReader, FileRef, RootMapper};
use ristretto_classfile::attributes::Attribute;
use ristretto_classfile::{ClassFile, Constant};
use std::io::{self, Cursor};
use std::sync::Arc;

/// Name declared by the `Module` attribute of a class file, `None` if the
/// class is not a module descriptor.
pub fn module_name_from_class_bytes(bytes: Vec<u8>) -> Result<Option<String>> {
    let class = ClassFile::from_bytes(&mut Cursor::new(bytes))
        .map_err(|e| JavaError::ClassFile(format!("{e:?}")))?;

    let Some(module_name_index) = class.attributes.iter().find_map(|attribute| match attribute {
        Attribute::Module {
            module_name_index, ..
        } => Some(*module_name_index),
        _ => None,
    }) else {
        return Ok(None);
    };

    let utf8_index = match class.constant_pool.get(module_name_index) {
        Some(Constant::Module(index)) => *index,
        other => {
            return Err(JavaError::ClassFile(format!(
                "module name index {module_name_index} points at {other:?}"
            )));
        }
    };
    let name = class
        .constant_pool
        .try_get_utf8(utf8_index)
        .map_err(|e| JavaError::ClassFile(format!("{e:?}")))?;
    Ok(Some(name.to_string()))
}

/// Reads `module-info.class` files through a [`RootMapper`].
pub struct ClassFileDescriptorReader {
    roots: Arc<dyn RootMapper>,
}

impl ClassFileDescriptorReader {
    pub fn new(roots: Arc<dyn RootMapper>) -> Self {
        Self { roots }
    }
}

impl DescriptorReader for ClassFileDescriptorReader {
    fn read_module_name(&self, module_info: &FileRef) -> io::Result<Option<String>> {
        let bytes = self.roots.read(module_info)?;
        module_name_from_class_bytes(bytes).map_err(io::Error::from)
    }
}

/// Minimal `module-info.class` for tests: one `Module` attribute, no
/// requires/exports.
#[cfg(test)]
pub(crate) fn module_info_bytes(name: &str) -> Vec<u8> {
    fn utf8(out: &mut Vec<u8>, s: &str) {
        out.push(1);
        out.extend_from_slice(&(s.len() as u16).to_be_bytes());
        out.extend_from_slice(s.as_bytes());
    }

    let mut out = Vec::new();
    out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&53u16.to_be_bytes());
    out.extend_from_slice(&6u16.to_be_bytes());
    utf8(&mut out, "module-info"); // #1
    out.extend_from_slice(&[7, 0, 1]); // #2 Class
    utf8(&mut out, "Module"); // #3
    utf8(&mut out, name); // #4
    out.extend_from_slice(&[19, 0, 4]); // #5 Module
    out.extend_from_slice(&0x8000u16.to_be_bytes());
    out.extend_from_slice(&2u16.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    // interfaces, fields, methods
    out.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&3u16.to_be_bytes());
    out.extend_from_slice(&16u32.to_be_bytes());
    out.extend_from_slice(&5u16.to_be_bytes());
    // flags, version, requires, exports, opens, uses, provides
    out.extend_from_slice(&[0; 14]);
    out
}
