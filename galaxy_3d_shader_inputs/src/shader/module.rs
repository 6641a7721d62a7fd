/// Shader module definitions
///
/// A ShaderModule is an immutable, shareable description of one reusable
/// unit of shading logic: its uniform schema, default values, optional
/// dependencies on other modules, and an optional derivation that turns
/// high-level application props into uniforms and bindings.
///
/// Modules are shared as `Arc<ShaderModule>` and never mutated after
/// creation. Per-pipeline state lives in `ShaderInputs`.

use std::fmt;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};
use super::layout::UniformBlockLayout;
use super::props::{ModuleUniformValues, PropertyBag};
use super::value::{UniformType, UniformValue};

// ===== DERIVATION =====

/// Translates high-level props into uniform values and bindings
///
/// `previous` holds the module's current uniforms, so a derivation can
/// compute values relative to the stored state. The returned bag may mix
/// uniforms and bindings; it is split afterwards.
pub trait DeriveUniforms: Send + Sync {
    fn derive_uniforms(&self, props: &PropertyBag, previous: &ModuleUniformValues) -> PropertyBag;
}

impl<F> DeriveUniforms for F
where
    F: Fn(&PropertyBag, &ModuleUniformValues) -> PropertyBag + Send + Sync,
{
    fn derive_uniforms(&self, props: &PropertyBag, previous: &ModuleUniformValues) -> PropertyBag {
        self(props, previous)
    }
}

/// How a module turns props into values
#[derive(Clone, Default)]
pub enum UniformDerivation {
    /// Props are used as-is
    #[default]
    Passthrough,
    /// Props go through the module's derivation first
    Derived(Arc<dyn DeriveUniforms>),
}

impl UniformDerivation {
    /// Wrap a derivation (closure or `DeriveUniforms` implementor)
    pub fn derived(derivation: impl DeriveUniforms + 'static) -> Self {
        UniformDerivation::Derived(Arc::new(derivation))
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, UniformDerivation::Passthrough)
    }
}

impl fmt::Debug for UniformDerivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformDerivation::Passthrough => write!(f, "Passthrough"),
            UniformDerivation::Derived(_) => write!(f, "Derived(..)"),
        }
    }
}

// ===== PROP TYPES =====

/// Declared default and valid range of an exposed prop (for inspector UIs)
#[derive(Debug, Clone, PartialEq)]
pub struct PropType {
    pub value: UniformValue,
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl PropType {
    pub fn new(value: impl Into<UniformValue>) -> Self {
        Self {
            value: value.into(),
            min: None,
            max: None,
        }
    }

    pub fn with_range(value: impl Into<UniformValue>, min: f32, max: f32) -> Self {
        Self {
            value: value.into(),
            min: Some(min),
            max: Some(max),
        }
    }
}

// ===== DESCRIPTORS =====

/// Shader module creation descriptor
#[derive(Debug, Clone, Default)]
pub struct ShaderModuleDesc {
    pub name: String,
    pub dependencies: Vec<Arc<ShaderModule>>,
    /// Uniform schema, in buffer layout order
    pub uniform_types: Vec<(String, UniformType)>,
    pub prop_types: Vec<(String, PropType)>,
    /// Overrides the prop type values
    pub default_uniforms: Vec<(String, UniformValue)>,
    pub derivation: UniformDerivation,
}

// ===== SHADER MODULE =====

pub struct ShaderModule {
    name: String,
    dependencies: Vec<Arc<ShaderModule>>,
    uniform_types: Vec<(String, UniformType)>,
    uniform_type_names: FxHashMap<String, usize>,
    prop_types: Vec<(String, PropType)>,
    default_uniforms: ModuleUniformValues,
    layout: UniformBlockLayout,
    derivation: UniformDerivation,
}

impl ShaderModule {
    /// Create a module from its descriptor
    ///
    /// # Errors
    ///
    /// `Error::InvalidModule` on duplicate field names, on an inverted prop
    /// range, on a uniform block that cannot be laid out, or when a default
    /// value does not match its declared type.
    pub fn from_desc(desc: ShaderModuleDesc) -> Result<Self> {
        let module_name = desc.name;

        // ========== VALIDATION 1: No duplicate uniform names ==========
        let mut uniform_type_names = FxHashMap::default();
        for (index, (field, _)) in desc.uniform_types.iter().enumerate() {
            if uniform_type_names.insert(field.clone(), index).is_some() {
                return Err(invalid(&module_name, format!("duplicate uniform type '{}'", field)));
            }
        }

        // ========== VALIDATION 2: No duplicate prop names, sane ranges ==========
        let mut seen_props = FxHashSet::default();
        for (prop, prop_type) in &desc.prop_types {
            if !seen_props.insert(prop.as_str()) {
                return Err(invalid(&module_name, format!("duplicate prop type '{}'", prop)));
            }
            if let (Some(min), Some(max)) = (prop_type.min, prop_type.max) {
                if min > max {
                    return Err(invalid(
                        &module_name,
                        format!("prop '{}' has min {} greater than max {}", prop, min, max),
                    ));
                }
            }
        }

        // ========== VALIDATION 3: No duplicate defaults ==========
        let mut seen_defaults = FxHashSet::default();
        for (field, _) in &desc.default_uniforms {
            if !seen_defaults.insert(field.as_str()) {
                return Err(invalid(&module_name, format!("duplicate default uniform '{}'", field)));
            }
        }

        // ========== VALIDATION 4: Uniform block fits in a buffer ==========
        let layout = UniformBlockLayout::new(&desc.uniform_types).map_err(|e| match e {
            Error::InvalidModule(message) => invalid(&module_name, message),
            other => other,
        })?;

        // ========== EFFECTIVE DEFAULTS ==========
        let mut default_uniforms = ModuleUniformValues::new();
        let prop_defaults = desc
            .prop_types
            .iter()
            .map(|(field, prop_type)| (field, &prop_type.value));
        let explicit_defaults = desc.default_uniforms.iter().map(|(field, value)| (field, value));
        for (field, value) in prop_defaults.chain(explicit_defaults) {
            if let Some(&index) = uniform_type_names.get(field) {
                let declared = desc.uniform_types[index].1;
                if !value.matches(declared) {
                    return Err(invalid(
                        &module_name,
                        format!(
                            "default for '{}' is {}, declared {}",
                            field,
                            value.uniform_type(),
                            declared
                        ),
                    ));
                }
            }
            default_uniforms.insert(field.clone(), value.clone());
        }

        Ok(Self {
            name: module_name,
            dependencies: desc.dependencies,
            uniform_types: desc.uniform_types,
            uniform_type_names,
            prop_types: desc.prop_types,
            default_uniforms,
            layout,
            derivation: desc.derivation,
        })
    }

    // ===== ACCESSORS =====

    /// Module name (may be empty for anonymous modules)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &[Arc<ShaderModule>] {
        &self.dependencies
    }

    /// Uniform schema in declaration order
    pub fn uniform_types(&self) -> &[(String, UniformType)] {
        &self.uniform_types
    }

    /// Declared type of a uniform field
    pub fn uniform_type(&self, field: &str) -> Option<UniformType> {
        self.uniform_type_names
            .get(field)
            .map(|&index| self.uniform_types[index].1)
    }

    pub fn prop_types(&self) -> &[(String, PropType)] {
        &self.prop_types
    }

    pub fn prop_type(&self, prop: &str) -> Option<&PropType> {
        self.prop_types
            .iter()
            .find(|(name, _)| name == prop)
            .map(|(_, prop_type)| prop_type)
    }

    /// Initial uniform values of every instance of this module
    pub fn default_uniforms(&self) -> &ModuleUniformValues {
        &self.default_uniforms
    }

    /// Byte layout of the uniform schema
    pub fn uniform_layout(&self) -> &UniformBlockLayout {
        &self.layout
    }

    pub fn derivation(&self) -> &UniformDerivation {
        &self.derivation
    }

    pub fn has_derivation(&self) -> bool {
        !self.derivation.is_passthrough()
    }

    // ===== DERIVATION =====

    /// Turn a partial prop update into uniform and binding values
    pub fn derive(&self, props: PropertyBag, previous: &ModuleUniformValues) -> PropertyBag {
        match &self.derivation {
            UniformDerivation::Passthrough => props,
            UniformDerivation::Derived(derivation) => derivation.derive_uniforms(&props, previous),
        }
    }
}

impl fmt::Debug for ShaderModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dependencies: Vec<&str> = self.dependencies.iter().map(|m| m.name()).collect();
        f.debug_struct("ShaderModule")
            .field("name", &self.name)
            .field("dependencies", &dependencies)
            .field("uniform_types", &self.uniform_types)
            .field("default_uniforms", &self.default_uniforms)
            .field("derivation", &self.derivation)
            .finish()
    }
}

fn invalid(module: &str, message: String) -> Error {
    Error::InvalidModule(format!("'{}': {}", module, message))
}

#[cfg(test)]
#[path = "module_tests.rs"]
mod tests;
