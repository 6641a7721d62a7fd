/// Uniform block layout and packing
///
/// Computes byte offsets for a module's uniform schema following the WGSL
/// uniform address space rules, and packs current uniform values into the
/// bytes a backend uploads to a uniform buffer.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use super::props::ModuleUniformValues;
use super::value::UniformType;

/// Uniform blocks are sized in multiples of 16 bytes
const BLOCK_ALIGNMENT: u32 = 16;

/// Largest uniform block a module may declare (WebGPU default binding limit)
pub const MAX_BLOCK_SIZE: u32 = 64 * 1024;

/// One field of a uniform block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformField {
    pub name: String,
    pub uniform_type: UniformType,
    /// Byte offset from the start of the block
    pub offset: u32,
}

/// Byte layout of one module's uniform block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformBlockLayout {
    fields: Vec<UniformField>,
    field_names: FxHashMap<String, usize>,
    size: u32,
}

impl UniformBlockLayout {
    /// Lay out fields in declaration order
    ///
    /// # Errors
    ///
    /// `Error::InvalidModule` if a field is an empty array or the block
    /// would exceed `MAX_BLOCK_SIZE`.
    pub fn new(uniform_types: &[(String, UniformType)]) -> Result<Self> {
        let mut fields = Vec::with_capacity(uniform_types.len());
        let mut field_names = FxHashMap::default();
        let mut offset = 0u32;

        for (name, uniform_type) in uniform_types {
            if *uniform_type == UniformType::ArrayF32(0) {
                return Err(Error::InvalidModule(format!(
                    "uniform '{}' is an empty array",
                    name
                )));
            }
            let field_offset = align_to(offset, uniform_type.align())
                .ok_or_else(|| too_large(name))?;
            offset = field_offset
                .checked_add(uniform_type.size())
                .filter(|&end| end <= MAX_BLOCK_SIZE)
                .ok_or_else(|| too_large(name))?;

            field_names.insert(name.clone(), fields.len());
            fields.push(UniformField {
                name: name.clone(),
                uniform_type: *uniform_type,
                offset: field_offset,
            });
        }

        // MAX_BLOCK_SIZE is itself 16-aligned, so rounding up stays in range
        let size = align_to(offset, BLOCK_ALIGNMENT).ok_or_else(|| too_large("<block end>"))?;

        Ok(Self {
            fields,
            field_names,
            size,
        })
    }

    pub fn fields(&self) -> &[UniformField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&UniformField> {
        self.field_names.get(name).map(|&index| &self.fields[index])
    }

    /// Block size in bytes (0 for an empty block)
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Pack values into block bytes
    ///
    /// Fields without a value stay zeroed. Values without a declared field
    /// are ignored.
    ///
    /// # Errors
    ///
    /// `Error::UniformTypeMismatch` if a value does not match its field type.
    pub fn pack(&self, values: &ModuleUniformValues) -> Result<Vec<u8>> {
        let mut words = vec![0u32; (self.size / 4) as usize];

        for field in &self.fields {
            let Some(value) = values.get(&field.name) else {
                continue;
            };
            if !value.matches(field.uniform_type) {
                return Err(Error::UniformTypeMismatch {
                    field: field.name.clone(),
                    expected: field.uniform_type.to_string(),
                    found: value.uniform_type().to_string(),
                });
            }

            let (columns, words_per_column, stride) = field.uniform_type.columns();
            let components = value.words();
            for column in 0..columns {
                let base = ((field.offset + column * stride) / 4) as usize;
                for word in 0..words_per_column {
                    let index = (column * words_per_column + word) as usize;
                    // Short float arrays leave trailing elements zeroed
                    if let Some(component) = components.get(index) {
                        words[base + word as usize] = *component;
                    }
                }
            }
        }

        Ok(bytemuck::cast_slice(&words).to_vec())
    }
}

fn align_to(offset: u32, alignment: u32) -> Option<u32> {
    offset.div_ceil(alignment).checked_mul(alignment)
}

fn too_large(field: &str) -> Error {
    Error::InvalidModule(format!(
        "uniform block exceeds {} bytes at '{}'",
        MAX_BLOCK_SIZE, field
    ))
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
