/// Shader bindings: references to backend GPU resources
///
/// A `Binding` is attached to a pipeline at draw time and is never packed
/// into uniform buffer bytes. Bindings only hold `Arc` references; the
/// backend that created a resource decides when it is destroyed.

use std::fmt;
use std::sync::Arc;

use crate::renderer::{Buffer, BufferUsage, Sampler, Texture};

/// How a shader accesses a bound buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferAccess {
    /// Uniform buffer (read-only structured data)
    Uniform,
    /// Storage buffer, read-only in the shader
    ReadOnlyStorage,
    /// Storage buffer, read/write in the shader
    Storage,
}

/// A reference to a GPU resource bound by name
#[derive(Clone)]
pub enum Binding {
    Texture(Arc<dyn Texture>),
    Sampler(Arc<dyn Sampler>),
    Buffer {
        buffer: Arc<dyn Buffer>,
        access: BufferAccess,
    },
}

impl Binding {
    /// Bind a texture
    pub fn texture(texture: Arc<dyn Texture>) -> Self {
        Binding::Texture(texture)
    }

    /// Bind a sampler
    pub fn sampler(sampler: Arc<dyn Sampler>) -> Self {
        Binding::Sampler(sampler)
    }

    /// Bind a buffer, deriving the access mode from its usage
    ///
    /// Storage buffers default to read-only access.
    pub fn buffer(buffer: Arc<dyn Buffer>) -> Self {
        let access = match buffer.usage() {
            BufferUsage::Storage => BufferAccess::ReadOnlyStorage,
            BufferUsage::Uniform => BufferAccess::Uniform,
        };
        Binding::Buffer { buffer, access }
    }

    /// Bind a buffer with an explicit access mode
    pub fn buffer_with_access(buffer: Arc<dyn Buffer>, access: BufferAccess) -> Self {
        Binding::Buffer { buffer, access }
    }

    /// Short name of the resource kind
    pub fn kind(&self) -> &'static str {
        match self {
            Binding::Texture(_) => "texture",
            Binding::Sampler(_) => "sampler",
            Binding::Buffer { .. } => "buffer",
        }
    }

    /// Access mode for buffer bindings
    pub fn access(&self) -> Option<BufferAccess> {
        match self {
            Binding::Buffer { access, .. } => Some(*access),
            _ => None,
        }
    }

    /// Whether both bindings reference the same GPU object (and access mode)
    pub fn same_resource(&self, other: &Binding) -> bool {
        match (self, other) {
            (Binding::Texture(a), Binding::Texture(b)) => same_object(a, b),
            (Binding::Sampler(a), Binding::Sampler(b)) => same_object(a, b),
            (
                Binding::Buffer { buffer: a, access: access_a },
                Binding::Buffer { buffer: b, access: access_b },
            ) => access_a == access_b && same_object(a, b),
            _ => false,
        }
    }
}

/// Compare the data pointers only (vtable pointers may differ across codegen units)
fn same_object<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.same_resource(other)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Texture(texture) => {
                let info = texture.info();
                write!(f, "Texture({}x{} {:?})", info.width, info.height, info.format)
            }
            Binding::Sampler(sampler) => write!(f, "Sampler({:?})", sampler.sampler_type()),
            Binding::Buffer { buffer, access } => {
                write!(f, "Buffer({} bytes, {:?})", buffer.size(), access)
            }
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
#[path = "binding_tests.rs"]
mod tests;
