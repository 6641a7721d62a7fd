/// Property values accepted by `ShaderInputs::set_props`
///
/// A `ShaderValue` is already discriminated: uniforms and bindings are
/// distinct variants, so classification never has to inspect a value's
/// shape. `Text` and `Nested` carry high-level application props that a
/// module's derivation expands into uniforms and bindings.

use std::collections::BTreeMap;
use std::fmt;

use super::binding::Binding;
use super::value::UniformValue;

// ===== MAPS =====

/// Property bag: field name to value (any kind)
pub type PropertyBag = BTreeMap<String, ShaderValue>;

/// Current uniform values of one module
pub type ModuleUniformValues = BTreeMap<String, UniformValue>;

/// Current bindings of one module
pub type ModuleBindingValues = BTreeMap<String, Binding>;

// ===== SHADER VALUE =====

/// A single property value
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderValue {
    /// Plain numeric data, packed into a uniform buffer
    Uniform(UniformValue),
    /// GPU resource reference, attached at draw time
    Binding(Binding),
    /// High-level text prop (e.g. a color name), meant for a derivation
    Text(String),
    /// High-level structured prop, meant for a derivation
    Nested(PropertyBag),
}

impl ShaderValue {
    /// Short name of the value kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            ShaderValue::Uniform(_) => "uniform",
            ShaderValue::Binding(binding) => binding.kind(),
            ShaderValue::Text(_) => "text",
            ShaderValue::Nested(_) => "nested",
        }
    }

    pub fn as_uniform(&self) -> Option<&UniformValue> {
        match self {
            ShaderValue::Uniform(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_binding(&self) -> Option<&Binding> {
        match self {
            ShaderValue::Binding(binding) => Some(binding),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ShaderValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Scalar float view, used by derivations reading numeric props
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            ShaderValue::Uniform(UniformValue::Float(v)) => Some(*v),
            ShaderValue::Uniform(UniformValue::Int(v)) => Some(*v as f32),
            ShaderValue::Uniform(UniformValue::UInt(v)) => Some(*v as f32),
            _ => None,
        }
    }
}

impl fmt::Display for ShaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderValue::Uniform(value) => write!(f, "{}", value),
            ShaderValue::Binding(binding) => write!(f, "{}", binding),
            ShaderValue::Text(text) => write!(f, "{}", text),
            ShaderValue::Nested(bag) => {
                write!(f, "{{")?;
                for (i, (key, value)) in bag.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

// ===== CONVERSIONS =====

impl From<UniformValue> for ShaderValue {
    fn from(value: UniformValue) -> Self {
        ShaderValue::Uniform(value)
    }
}

impl From<Binding> for ShaderValue {
    fn from(binding: Binding) -> Self {
        ShaderValue::Binding(binding)
    }
}

impl From<String> for ShaderValue {
    fn from(text: String) -> Self {
        ShaderValue::Text(text)
    }
}

impl From<&str> for ShaderValue {
    fn from(text: &str) -> Self {
        ShaderValue::Text(text.to_string())
    }
}

impl From<PropertyBag> for ShaderValue {
    fn from(bag: PropertyBag) -> Self {
        ShaderValue::Nested(bag)
    }
}

macro_rules! impl_shader_value_from_uniform {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ShaderValue {
                fn from(value: $ty) -> Self {
                    ShaderValue::Uniform(UniformValue::from(value))
                }
            }
        )*
    };
}

impl_shader_value_from_uniform!(
    f32,
    i32,
    u32,
    bool,
    [f32; 2],
    [f32; 3],
    [f32; 4],
    [i32; 2],
    [i32; 3],
    [i32; 4],
    [u32; 2],
    [u32; 3],
    [u32; 4],
    [f32; 9],
    [f32; 16],
    Vec<f32>,
    &[f32],
    glam::Vec2,
    glam::Vec3,
    glam::Vec4,
    glam::IVec2,
    glam::IVec3,
    glam::IVec4,
    glam::UVec2,
    glam::UVec3,
    glam::UVec4,
    glam::Mat2,
    glam::Mat3,
    glam::Mat4,
);

// ===== MACRO =====

/// Build a `PropertyBag` from `"name" => value` pairs
///
/// Values go through `ShaderValue::from`, so plain numbers, arrays, glam
/// types, bindings, text and nested bags are all accepted.
///
/// ```
/// use galaxy_3d_shader_inputs::shader_props;
///
/// let props = shader_props! { "density" => 0.8f32, "mode" => "linear" };
/// assert_eq!(props.len(), 2);
/// ```
#[macro_export]
macro_rules! shader_props {
    () => {
        $crate::shader::PropertyBag::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut bag = $crate::shader::PropertyBag::new();
        $(
            bag.insert(
                ::std::string::String::from($key),
                $crate::shader::ShaderValue::from($value),
            );
        )+
        bag
    }};
}

#[cfg(test)]
#[path = "props_tests.rs"]
mod tests;
