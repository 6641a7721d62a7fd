/*!
# Galaxy 3D Shader Inputs

Shader input composition for the Galaxy 3D rendering engine.

Independently authored shader modules declare their own uniform fields,
defaults and dependencies. `ShaderInputs` combines them for one pipeline,
accepts partial prop updates, and exposes the result in the two shapes a
backend consumes: per-module uniform values (packed into uniform buffer
bytes) and one flat map of resource bindings.

## Architecture

- **ShaderModule**: immutable module definition (uniform schema, defaults, derivation)
- **resolve_module_dependencies**: transitive, deduplicated module closure
- **split_uniforms_and_bindings**: partition of tagged prop values
- **UniformBlockLayout**: WGSL uniform block offsets and packing
- **ShaderInputs**: per-pipeline value store and update API

Backend resources (`Texture`, `Sampler`, `Buffer`) are traits; bindings only
hold `Arc` references to objects the backend owns.
*/

// Internal modules
mod error;
pub mod log;
pub mod renderer;
pub mod shader;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result, Warning};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger, RecordingLogger};
    }

    // Render sub-module with backend resource traits
    pub mod render {
        pub use crate::renderer::*;
    }

    // Shader sub-module
    pub mod shader {
        pub use crate::shader::*;
    }
}

// Re-export math library at crate root
pub use glam;
