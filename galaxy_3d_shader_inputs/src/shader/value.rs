/// Uniform types and uniform values
///
/// A `UniformType` is the declared type tag of a uniform field (the WGSL
/// spelling is used as canonical text form). A `UniformValue` is the plain
/// numeric data stored for that field; it never holds GPU resources.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

// ===== UNIFORM TYPE =====

/// Declared type of a uniform field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformType {
    F32,
    I32,
    U32,
    /// Stored as a 32-bit integer (0 or 1) in uniform buffers
    Bool,
    Vec2F32,
    Vec3F32,
    Vec4F32,
    Vec2I32,
    Vec3I32,
    Vec4I32,
    Vec2U32,
    Vec3U32,
    Vec4U32,
    Mat2x2F32,
    Mat3x3F32,
    Mat4x4F32,
    /// Fixed-size float array (`array<f32, N>`)
    ArrayF32(u32),
}

impl UniformType {
    /// Size in bytes in the uniform address space (saturates for huge arrays)
    pub fn size(&self) -> u32 {
        match self {
            UniformType::F32 | UniformType::I32 | UniformType::U32 | UniformType::Bool => 4,
            UniformType::Vec2F32 | UniformType::Vec2I32 | UniformType::Vec2U32 => 8,
            UniformType::Vec3F32 | UniformType::Vec3I32 | UniformType::Vec3U32 => 12,
            UniformType::Vec4F32 | UniformType::Vec4I32 | UniformType::Vec4U32 => 16,
            UniformType::Mat2x2F32 => 16,
            UniformType::Mat3x3F32 => 48,
            UniformType::Mat4x4F32 => 64,
            UniformType::ArrayF32(count) => count.saturating_mul(16),
        }
    }

    /// Required alignment in bytes in the uniform address space
    pub fn align(&self) -> u32 {
        match self {
            UniformType::F32 | UniformType::I32 | UniformType::U32 | UniformType::Bool => 4,
            UniformType::Vec2F32 | UniformType::Vec2I32 | UniformType::Vec2U32 => 8,
            UniformType::Mat2x2F32 => 8,
            _ => 16,
        }
    }

    /// Memory shape as (columns, 32-bit words per column, column stride in bytes)
    ///
    /// Scalars and vectors are a single column. Uniform arrays use a 16 byte
    /// element stride.
    pub fn columns(&self) -> (u32, u32, u32) {
        match self {
            UniformType::F32 | UniformType::I32 | UniformType::U32 | UniformType::Bool => (1, 1, 4),
            UniformType::Vec2F32 | UniformType::Vec2I32 | UniformType::Vec2U32 => (1, 2, 8),
            UniformType::Vec3F32 | UniformType::Vec3I32 | UniformType::Vec3U32 => (1, 3, 16),
            UniformType::Vec4F32 | UniformType::Vec4I32 | UniformType::Vec4U32 => (1, 4, 16),
            UniformType::Mat2x2F32 => (2, 2, 8),
            UniformType::Mat3x3F32 => (3, 3, 16),
            UniformType::Mat4x4F32 => (4, 4, 16),
            UniformType::ArrayF32(count) => (*count, 1, 16),
        }
    }

    /// Total number of scalar components
    pub fn components(&self) -> u32 {
        let (columns, words, _) = self.columns();
        columns * words
    }

    /// Whether the components are 32-bit floats
    pub fn is_float(&self) -> bool {
        matches!(
            self,
            UniformType::F32
                | UniformType::Vec2F32
                | UniformType::Vec3F32
                | UniformType::Vec4F32
                | UniformType::Mat2x2F32
                | UniformType::Mat3x3F32
                | UniformType::Mat4x4F32
                | UniformType::ArrayF32(_)
        )
    }
}

impl fmt::Display for UniformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformType::F32 => write!(f, "f32"),
            UniformType::I32 => write!(f, "i32"),
            UniformType::U32 => write!(f, "u32"),
            UniformType::Bool => write!(f, "bool"),
            UniformType::Vec2F32 => write!(f, "vec2<f32>"),
            UniformType::Vec3F32 => write!(f, "vec3<f32>"),
            UniformType::Vec4F32 => write!(f, "vec4<f32>"),
            UniformType::Vec2I32 => write!(f, "vec2<i32>"),
            UniformType::Vec3I32 => write!(f, "vec3<i32>"),
            UniformType::Vec4I32 => write!(f, "vec4<i32>"),
            UniformType::Vec2U32 => write!(f, "vec2<u32>"),
            UniformType::Vec3U32 => write!(f, "vec3<u32>"),
            UniformType::Vec4U32 => write!(f, "vec4<u32>"),
            UniformType::Mat2x2F32 => write!(f, "mat2x2<f32>"),
            UniformType::Mat3x3F32 => write!(f, "mat3x3<f32>"),
            UniformType::Mat4x4F32 => write!(f, "mat4x4<f32>"),
            UniformType::ArrayF32(count) => write!(f, "array<f32, {}>", count),
        }
    }
}

impl FromStr for UniformType {
    type Err = Error;

    /// Parses WGSL spellings (`vec3<f32>`) and their shorthand aliases (`vec3f`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let parsed = match compact.as_str() {
            "f32" => UniformType::F32,
            "i32" => UniformType::I32,
            "u32" => UniformType::U32,
            "bool" => UniformType::Bool,
            "vec2<f32>" | "vec2f" => UniformType::Vec2F32,
            "vec3<f32>" | "vec3f" => UniformType::Vec3F32,
            "vec4<f32>" | "vec4f" => UniformType::Vec4F32,
            "vec2<i32>" | "vec2i" => UniformType::Vec2I32,
            "vec3<i32>" | "vec3i" => UniformType::Vec3I32,
            "vec4<i32>" | "vec4i" => UniformType::Vec4I32,
            "vec2<u32>" | "vec2u" => UniformType::Vec2U32,
            "vec3<u32>" | "vec3u" => UniformType::Vec3U32,
            "vec4<u32>" | "vec4u" => UniformType::Vec4U32,
            "mat2x2<f32>" | "mat2x2f" => UniformType::Mat2x2F32,
            "mat3x3<f32>" | "mat3x3f" => UniformType::Mat3x3F32,
            "mat4x4<f32>" | "mat4x4f" => UniformType::Mat4x4F32,
            other => {
                let count = other
                    .strip_prefix("array<f32,")
                    .and_then(|rest| rest.strip_suffix('>'))
                    .and_then(|n| n.parse::<u32>().ok())
                    .filter(|n| *n > 0);
                match count {
                    Some(n) => UniformType::ArrayF32(n),
                    None => {
                        return Err(Error::InvalidModule(format!(
                            "unknown uniform type '{}'",
                            s
                        )))
                    }
                }
            }
        };
        Ok(parsed)
    }
}

// ===== UNIFORM VALUE =====

/// A plain numeric value destined for a uniform buffer
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    UInt(u32),
    Bool(bool),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    IVec2([i32; 2]),
    IVec3([i32; 3]),
    IVec4([i32; 4]),
    UVec2([u32; 2]),
    UVec3([u32; 3]),
    UVec4([u32; 4]),
    /// Column-major 2x2 matrix
    Mat2([f32; 4]),
    /// Column-major 3x3 matrix
    Mat3([f32; 9]),
    /// Column-major 4x4 matrix
    Mat4([f32; 16]),
    /// Untyped float data (arrays, or vectors/matrices given as flat lists)
    FloatArray(Vec<f32>),
}

impl UniformValue {
    /// The natural type of this value
    pub fn uniform_type(&self) -> UniformType {
        match self {
            UniformValue::Float(_) => UniformType::F32,
            UniformValue::Int(_) => UniformType::I32,
            UniformValue::UInt(_) => UniformType::U32,
            UniformValue::Bool(_) => UniformType::Bool,
            UniformValue::Vec2(_) => UniformType::Vec2F32,
            UniformValue::Vec3(_) => UniformType::Vec3F32,
            UniformValue::Vec4(_) => UniformType::Vec4F32,
            UniformValue::IVec2(_) => UniformType::Vec2I32,
            UniformValue::IVec3(_) => UniformType::Vec3I32,
            UniformValue::IVec4(_) => UniformType::Vec4I32,
            UniformValue::UVec2(_) => UniformType::Vec2U32,
            UniformValue::UVec3(_) => UniformType::Vec3U32,
            UniformValue::UVec4(_) => UniformType::Vec4U32,
            UniformValue::Mat2(_) => UniformType::Mat2x2F32,
            UniformValue::Mat3(_) => UniformType::Mat3x3F32,
            UniformValue::Mat4(_) => UniformType::Mat4x4F32,
            UniformValue::FloatArray(values) => UniformType::ArrayF32(values.len() as u32),
        }
    }

    /// Whether this value can be stored in a field of the given type
    ///
    /// Exact type matches are accepted. A `FloatArray` is also accepted by any
    /// float type with the same component count, and by a float array type
    /// with at least as many elements.
    pub fn matches(&self, uniform_type: UniformType) -> bool {
        if self.uniform_type() == uniform_type {
            return true;
        }
        match (self, uniform_type) {
            (UniformValue::FloatArray(values), UniformType::ArrayF32(count)) => {
                values.len() as u32 <= count
            }
            (UniformValue::FloatArray(values), ty) if ty.is_float() => {
                values.len() as u32 == ty.components()
            }
            _ => false,
        }
    }

    /// Raw 32-bit words of the components, in storage order
    pub fn words(&self) -> Vec<u32> {
        fn floats(values: &[f32]) -> Vec<u32> {
            values.iter().map(|v| v.to_bits()).collect()
        }
        fn ints(values: &[i32]) -> Vec<u32> {
            values.iter().map(|v| *v as u32).collect()
        }

        match self {
            UniformValue::Float(v) => vec![v.to_bits()],
            UniformValue::Int(v) => vec![*v as u32],
            UniformValue::UInt(v) => vec![*v],
            UniformValue::Bool(v) => vec![*v as u32],
            UniformValue::Vec2(v) => floats(v),
            UniformValue::Vec3(v) => floats(v),
            UniformValue::Vec4(v) => floats(v),
            UniformValue::IVec2(v) => ints(v),
            UniformValue::IVec3(v) => ints(v),
            UniformValue::IVec4(v) => ints(v),
            UniformValue::UVec2(v) => v.to_vec(),
            UniformValue::UVec3(v) => v.to_vec(),
            UniformValue::UVec4(v) => v.to_vec(),
            UniformValue::Mat2(v) => floats(v),
            UniformValue::Mat3(v) => floats(v),
            UniformValue::Mat4(v) => floats(v),
            UniformValue::FloatArray(v) => floats(v),
        }
    }
}

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

impl fmt::Display for UniformValue {
    /// Components separated by commas, e.g. `0.5` or `1,0,0,1`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformValue::Float(v) => write!(f, "{}", v),
            UniformValue::Int(v) => write!(f, "{}", v),
            UniformValue::UInt(v) => write!(f, "{}", v),
            UniformValue::Bool(v) => write!(f, "{}", v),
            UniformValue::Vec2(v) => join(f, v),
            UniformValue::Vec3(v) => join(f, v),
            UniformValue::Vec4(v) => join(f, v),
            UniformValue::IVec2(v) => join(f, v),
            UniformValue::IVec3(v) => join(f, v),
            UniformValue::IVec4(v) => join(f, v),
            UniformValue::UVec2(v) => join(f, v),
            UniformValue::UVec3(v) => join(f, v),
            UniformValue::UVec4(v) => join(f, v),
            UniformValue::Mat2(v) => join(f, v),
            UniformValue::Mat3(v) => join(f, v),
            UniformValue::Mat4(v) => join(f, v),
            UniformValue::FloatArray(v) => join(f, v),
        }
    }
}

// ===== CONVERSIONS =====

macro_rules! impl_uniform_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for UniformValue {
                fn from(value: $ty) -> Self {
                    UniformValue::$variant(value)
                }
            }
        )+
    };
}

impl_uniform_from!(
    f32 => Float,
    i32 => Int,
    u32 => UInt,
    bool => Bool,
    [f32; 2] => Vec2,
    [f32; 3] => Vec3,
    [f32; 4] => Vec4,
    [i32; 2] => IVec2,
    [i32; 3] => IVec3,
    [i32; 4] => IVec4,
    [u32; 2] => UVec2,
    [u32; 3] => UVec3,
    [u32; 4] => UVec4,
    [f32; 9] => Mat3,
    [f32; 16] => Mat4,
    Vec<f32> => FloatArray,
);

impl From<&[f32]> for UniformValue {
    fn from(value: &[f32]) -> Self {
        UniformValue::FloatArray(value.to_vec())
    }
}

impl From<glam::Vec2> for UniformValue {
    fn from(value: glam::Vec2) -> Self {
        UniformValue::Vec2(value.to_array())
    }
}

impl From<glam::Vec3> for UniformValue {
    fn from(value: glam::Vec3) -> Self {
        UniformValue::Vec3(value.to_array())
    }
}

impl From<glam::Vec4> for UniformValue {
    fn from(value: glam::Vec4) -> Self {
        UniformValue::Vec4(value.to_array())
    }
}

impl From<glam::IVec2> for UniformValue {
    fn from(value: glam::IVec2) -> Self {
        UniformValue::IVec2(value.to_array())
    }
}

impl From<glam::IVec3> for UniformValue {
    fn from(value: glam::IVec3) -> Self {
        UniformValue::IVec3(value.to_array())
    }
}

impl From<glam::IVec4> for UniformValue {
    fn from(value: glam::IVec4) -> Self {
        UniformValue::IVec4(value.to_array())
    }
}

impl From<glam::UVec2> for UniformValue {
    fn from(value: glam::UVec2) -> Self {
        UniformValue::UVec2(value.to_array())
    }
}

impl From<glam::UVec3> for UniformValue {
    fn from(value: glam::UVec3) -> Self {
        UniformValue::UVec3(value.to_array())
    }
}

impl From<glam::UVec4> for UniformValue {
    fn from(value: glam::UVec4) -> Self {
        UniformValue::UVec4(value.to_array())
    }
}

impl From<glam::Mat2> for UniformValue {
    fn from(value: glam::Mat2) -> Self {
        UniformValue::Mat2(value.to_cols_array())
    }
}

impl From<glam::Mat3> for UniformValue {
    fn from(value: glam::Mat3) -> Self {
        UniformValue::Mat3(value.to_cols_array())
    }
}

impl From<glam::Mat4> for UniformValue {
    fn from(value: glam::Mat4) -> Self {
        UniformValue::Mat4(value.to_cols_array())
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
