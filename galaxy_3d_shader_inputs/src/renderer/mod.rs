/// Renderer module - backend resource traits referenced by shader bindings
///
/// The concrete objects are created and owned by a backend (Vulkan, etc.).
/// Shader inputs only hold `Arc` references to them.

// Module declarations
pub mod texture;
pub mod sampler;
pub mod buffer;

// Re-export from modules
pub use texture::*;
pub use sampler::*;
pub use buffer::*;

// Mock backend resources for tests (no GPU required)
#[cfg(test)]
pub mod mock_backend;
