/// Uniform / binding classification
///
/// Partitions a property bag into plain uniform data and resource bindings.
/// Values are already tagged, so this is a match over the variant and never
/// depends on field names.

use super::props::{ModuleBindingValues, ModuleUniformValues, PropertyBag, ShaderValue};

/// Result of splitting one property bag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitValues {
    pub uniforms: ModuleUniformValues,
    pub bindings: ModuleBindingValues,
    /// Keys that are neither uniforms nor bindings, with their value kind
    pub unclassified: Vec<(String, &'static str)>,
}

impl SplitValues {
    pub fn is_empty(&self) -> bool {
        self.uniforms.is_empty() && self.bindings.is_empty() && self.unclassified.is_empty()
    }
}

/// Split a property bag into uniforms and bindings
///
/// Every key lands in exactly one of the three outputs.
pub fn split_uniforms_and_bindings(values: PropertyBag) -> SplitValues {
    let mut split = SplitValues::default();
    for (key, value) in values {
        match value {
            ShaderValue::Uniform(uniform) => {
                split.uniforms.insert(key, uniform);
            }
            ShaderValue::Binding(binding) => {
                split.bindings.insert(key, binding);
            }
            other => split.unclassified.push((key, other.kind_name())),
        }
    }
    split
}

#[cfg(test)]
#[path = "splitter_tests.rs"]
mod tests;
