/// Shader module - composition of shader module inputs
///
/// Modules declare uniform schemas, defaults and dependencies. `ShaderInputs`
/// resolves a module set, stores per-module uniform and binding values, and
/// merges them for buffer packing and pipeline binding.

// Module declarations
pub mod value;
pub mod binding;
pub mod props;
pub mod module;
pub mod dependencies;
pub mod splitter;
pub mod layout;
pub mod shader_inputs;

// Re-export from modules
pub use value::{UniformType, UniformValue};
pub use binding::{Binding, BufferAccess};
pub use props::{ModuleBindingValues, ModuleUniformValues, PropertyBag, ShaderValue};
pub use module::{DeriveUniforms, PropType, ShaderModule, ShaderModuleDesc, UniformDerivation};
pub use dependencies::resolve_module_dependencies;
pub use splitter::{split_uniforms_and_bindings, SplitValues};
pub use layout::{UniformBlockLayout, UniformField, MAX_BLOCK_SIZE};
pub use shader_inputs::{
    BindingCollisionPolicy, DebugTableEntry, ModuleChanges, ShaderInputs, ShaderInputsDesc,
};
