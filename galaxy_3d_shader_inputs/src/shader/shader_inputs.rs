/// ShaderInputs: per-pipeline uniform and binding state for a set of modules
///
/// ShaderInputs owns the resolved module set of one pipeline and the current
/// uniform and binding values of each module. Callers feed partial prop
/// updates through `set_props`; each module's derivation turns props into
/// values, which are split into uniforms and bindings and merged field by
/// field into the stored state.
///
/// Read side:
/// - `uniform_values()` / `uniform_buffer_data()` for uniform buffer packing
/// - `binding_values()` for pipeline binding (one flat map over all modules)
/// - `take_changes()` to skip redundant buffer writes and rebuilds
///
/// Usage is single-threaded per instance: mutation goes through `&mut self`.
/// Bindings are references only; GPU resources stay owned by the backend.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result, Warning};
use crate::log::{DefaultLogger, Logger};
use crate::renderer::Buffer;
use crate::{inputs_debug, inputs_error, inputs_warn};
use super::binding::Binding;
use super::dependencies::resolve_module_dependencies;
use super::module::ShaderModule;
use super::props::{ModuleBindingValues, ModuleUniformValues, PropertyBag};
use super::splitter::split_uniforms_and_bindings;
use super::value::{UniformType, UniformValue};

const SOURCE: &str = "galaxy3d::ShaderInputs";
const MODULE_SOURCE: &str = "galaxy3d::ShaderModule";

// ===== CONFIGURATION =====

/// What `binding_values()` does when two modules bind the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingCollisionPolicy {
    /// The later module in registration order wins silently
    #[default]
    LastModuleWins,
    /// The later module wins and a warning is logged
    Warn,
}

/// ShaderInputs creation descriptor
#[derive(Clone, Default)]
pub struct ShaderInputsDesc {
    /// Modules keyed by registration name; `None` entries are skipped
    pub modules: Vec<(String, Option<Arc<ShaderModule>>)>,
    /// Diagnostics sink (a `DefaultLogger` when absent)
    pub logger: Option<Arc<dyn Logger>>,
    pub binding_collisions: BindingCollisionPolicy,
}

impl ShaderInputsDesc {
    /// Register each module under its own name
    pub fn from_modules(modules: &[Arc<ShaderModule>]) -> Self {
        Self {
            modules: modules
                .iter()
                .map(|module| (module.name().to_string(), Some(module.clone())))
                .collect(),
            ..Default::default()
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_binding_collisions(mut self, policy: BindingCollisionPolicy) -> Self {
        self.binding_collisions = policy;
        self
    }
}

// ===== CHANGE TRACKING =====

bitflags! {
    /// Which parts of a module's state changed since the last `take_changes()`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModuleChanges: u8 {
        const UNIFORMS = 1 << 0;
        const BINDINGS = 1 << 1;
    }
}

// ===== DEBUG TABLE =====

/// One row of the debug table (`"module.field"` keyed)
#[derive(Debug, Clone, PartialEq)]
pub struct DebugTableEntry {
    /// Declared type, if the module declares one for this field
    pub uniform_type: Option<UniformType>,
    pub value: String,
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl fmt::Display for DebugTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.uniform_type {
            Some(uniform_type) => write!(f, "{} = {}", uniform_type, self.value)?,
            None => write!(f, "? = {}", self.value)?,
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            write!(f, " [{}, {}]", min, max)?;
        }
        Ok(())
    }
}

// ===== MODULE SLOT =====

/// Stored state of one registered module
struct ModuleSlot {
    /// Registration key (may differ from the module's declared name)
    name: String,
    module: Arc<ShaderModule>,
    uniforms: ModuleUniformValues,
    bindings: ModuleBindingValues,
    changes: ModuleChanges,
}

impl ModuleSlot {
    fn new(name: String, module: Arc<ShaderModule>) -> Self {
        Self {
            name,
            uniforms: module.default_uniforms().clone(),
            bindings: ModuleBindingValues::new(),
            // First upload is always pending
            changes: ModuleChanges::UNIFORMS,
            module,
        }
    }

    /// Field-wise overwrite; returns what actually changed
    fn merge(&mut self, uniforms: ModuleUniformValues, bindings: ModuleBindingValues) -> ModuleChanges {
        let mut changes = ModuleChanges::empty();

        for (field, value) in uniforms {
            if self.uniforms.get(&field) != Some(&value) {
                changes |= ModuleChanges::UNIFORMS;
            }
            self.uniforms.insert(field, value);
        }

        for (name, binding) in bindings {
            let same = self
                .bindings
                .get(&name)
                .is_some_and(|old| old.same_resource(&binding));
            if !same {
                changes |= ModuleChanges::BINDINGS;
            }
            self.bindings.insert(name, binding);
        }

        self.changes |= changes;
        changes
    }
}

// ===== SHADER INPUTS =====

pub struct ShaderInputs {
    /// Registration order
    slots: Vec<ModuleSlot>,
    slot_names: FxHashMap<String, usize>,
    logger: Arc<dyn Logger>,
    binding_collisions: BindingCollisionPolicy,
}

impl ShaderInputs {
    /// Create shader inputs from a descriptor
    ///
    /// Explicit registrations come first, in descriptor order. Dependencies
    /// of the registered modules are then appended under their own names;
    /// they never replace an explicit registration.
    ///
    /// # Errors
    ///
    /// `Error::CyclicDependency` if the module dependencies form a cycle.
    pub fn from_desc(desc: ShaderInputsDesc) -> Result<Self> {
        let logger = desc
            .logger
            .unwrap_or_else(|| Arc::new(DefaultLogger::new()) as Arc<dyn Logger>);

        let mut inputs = Self {
            slots: Vec::with_capacity(desc.modules.len()),
            slot_names: FxHashMap::default(),
            logger,
            binding_collisions: desc.binding_collisions,
        };

        // ========== EXPLICIT REGISTRATIONS ==========
        for (key, module) in desc.modules {
            match module {
                Some(module) => inputs.register(key, module),
                None => inputs_debug!(inputs.logger, SOURCE, "Skipping missing module '{}'", key),
            }
        }

        // ========== DEPENDENCY CLOSURE ==========
        let explicit: Vec<Arc<ShaderModule>> =
            inputs.slots.iter().map(|slot| slot.module.clone()).collect();
        let resolved =
            resolve_module_dependencies(&explicit).map_err(|e| inputs.log_and_return_error(e))?;
        for module in resolved {
            inputs.register_dependency(module);
        }

        inputs_debug!(
            inputs.logger,
            SOURCE,
            "Creating ShaderInputs with modules [{}]",
            inputs.slots.iter().map(|slot| slot.name.as_str()).collect::<Vec<_>>().join(", ")
        );

        Ok(inputs)
    }

    /// Create shader inputs keyed by module names, with the default logger
    pub fn new(modules: &[Arc<ShaderModule>]) -> Result<Self> {
        Self::from_desc(ShaderInputsDesc::from_modules(modules))
    }

    fn log_and_return_error(&self, error: Error) -> Error {
        inputs_error!(self.logger, SOURCE, "{}", error);
        error
    }

    fn register(&mut self, key: String, module: Arc<ShaderModule>) {
        if module.name().is_empty() {
            warn(&*self.logger, MODULE_SOURCE, Warning::UnnamedModule { key: key.clone() });
        } else if module.name() != key {
            warn(
                &*self.logger,
                MODULE_SOURCE,
                Warning::NameMismatch {
                    key: key.clone(),
                    declared: module.name().to_string(),
                },
            );
        }

        match self.slot_names.get(&key) {
            Some(&index) => {
                if Arc::ptr_eq(&self.slots[index].module, &module) {
                    return;
                }
                warn(&*self.logger, MODULE_SOURCE, Warning::ModuleConflict { name: key.clone() });
                self.slots[index] = ModuleSlot::new(key, module);
            }
            None => {
                self.slot_names.insert(key.clone(), self.slots.len());
                self.slots.push(ModuleSlot::new(key, module));
            }
        }
    }

    fn register_dependency(&mut self, module: Arc<ShaderModule>) {
        // Explicit modules come back from the resolver too, maybe under an alias
        if self.slots.iter().any(|slot| Arc::ptr_eq(&slot.module, &module)) {
            return;
        }

        // Dependencies register under their own name; without one there is no key
        if module.name().is_empty() {
            warn(&*self.logger, MODULE_SOURCE, Warning::UnnamedDependency);
            return;
        }

        if self.slot_names.contains_key(module.name()) {
            warn(
                &*self.logger,
                MODULE_SOURCE,
                Warning::ModuleConflict {
                    name: module.name().to_string(),
                },
            );
            return;
        }

        let key = module.name().to_string();
        self.slot_names.insert(key.clone(), self.slots.len());
        self.slots.push(ModuleSlot::new(key, module));
    }

    fn slot(&self, name: &str) -> Option<&ModuleSlot> {
        self.slot_names.get(name).map(|&index| &self.slots[index])
    }

    // ===== UPDATE =====

    /// Apply partial prop updates, per module
    ///
    /// Unknown module names are logged and skipped; the rest of the batch
    /// is still applied. Fields absent from an update keep their value.
    /// A value that does not match its declared uniform type is stored but
    /// logged, since packing that module will fail until it is replaced.
    pub fn set_props<I, K>(&mut self, props: I)
    where
        I: IntoIterator<Item = (K, PropertyBag)>,
        K: AsRef<str>,
    {
        for (name, module_props) in props {
            let name = name.as_ref();
            let Some(&index) = self.slot_names.get(name) else {
                warn(
                    &*self.logger,
                    SOURCE,
                    Warning::UnknownModule {
                        module: name.to_string(),
                    },
                );
                continue;
            };

            let slot = &mut self.slots[index];
            let combined = slot.module.derive(module_props, &slot.uniforms);
            let split = split_uniforms_and_bindings(combined);

            for (field, kind) in split.unclassified {
                warn(
                    &*self.logger,
                    SOURCE,
                    Warning::UnclassifiableValue {
                        module: slot.name.clone(),
                        field,
                        kind,
                    },
                );
            }

            for (field, value) in &split.uniforms {
                let Some(declared) = slot.module.uniform_type(field) else {
                    continue;
                };
                if !value.matches(declared) {
                    warn(
                        &*self.logger,
                        SOURCE,
                        Warning::UniformTypeMismatch {
                            module: slot.name.clone(),
                            field: field.clone(),
                            expected: declared.to_string(),
                            found: value.uniform_type().to_string(),
                        },
                    );
                }
            }

            slot.merge(split.uniforms, split.bindings);
        }
    }

    // ===== READ =====

    /// Current uniforms of every module, keyed by registration name
    pub fn uniform_values(&self) -> BTreeMap<&str, &ModuleUniformValues> {
        self.slots
            .iter()
            .map(|slot| (slot.name.as_str(), &slot.uniforms))
            .collect()
    }

    pub fn module_uniforms(&self, name: &str) -> Option<&ModuleUniformValues> {
        self.slot(name).map(|slot| &slot.uniforms)
    }

    /// Current value of one uniform field
    pub fn uniform(&self, module: &str, field: &str) -> Option<&UniformValue> {
        self.slot(module).and_then(|slot| slot.uniforms.get(field))
    }

    pub fn module_bindings(&self, name: &str) -> Option<&ModuleBindingValues> {
        self.slot(name).map(|slot| &slot.bindings)
    }

    /// Bindings of all modules merged into one map
    ///
    /// On a name collision the module registered later wins.
    pub fn binding_values(&self) -> BTreeMap<String, Binding> {
        let mut merged = BTreeMap::new();
        let mut owners: FxHashMap<&str, &str> = FxHashMap::default();

        for slot in &self.slots {
            for (name, binding) in &slot.bindings {
                if let Some(previous) = owners.insert(name, &slot.name) {
                    if self.binding_collisions == BindingCollisionPolicy::Warn {
                        warn(
                            &*self.logger,
                            SOURCE,
                            Warning::BindingCollision {
                                binding: name.clone(),
                                previous: previous.to_string(),
                                winner: slot.name.clone(),
                            },
                        );
                    }
                }
                merged.insert(name.clone(), binding.clone());
            }
        }

        merged
    }

    // ===== UNIFORM BUFFERS =====

    /// Size in bytes of a module's uniform block
    pub fn uniform_buffer_size(&self, name: &str) -> Option<u32> {
        self.slot(name).map(|slot| slot.module.uniform_layout().size())
    }

    /// Pack a module's current uniforms into uniform buffer bytes
    ///
    /// # Errors
    ///
    /// `Error::UnknownModule` for an unregistered name,
    /// `Error::UniformTypeMismatch` if a stored value does not fit its
    /// declared type.
    pub fn uniform_buffer_data(&self, name: &str) -> Result<Vec<u8>> {
        let slot = self
            .slot(name)
            .ok_or_else(|| self.log_and_return_error(Error::UnknownModule(name.to_string())))?;
        slot.module
            .uniform_layout()
            .pack(&slot.uniforms)
            .map_err(|e| self.log_and_return_error(e))
    }

    /// Write a module's packed uniforms at the start of `buffer`
    ///
    /// Clears the module's `UNIFORMS` change flag on success.
    ///
    /// # Errors
    ///
    /// Same as `uniform_buffer_data`, plus `Error::BackendError` if the
    /// buffer is too small or the backend write fails.
    pub fn write_uniform_buffer(&mut self, name: &str, buffer: &dyn Buffer) -> Result<()> {
        let data = self.uniform_buffer_data(name)?;

        if data.len() as u64 > buffer.size() {
            return Err(self.log_and_return_error(Error::BackendError(format!(
                "Uniform block of module '{}' is {} bytes, buffer holds {}",
                name,
                data.len(),
                buffer.size()
            ))));
        }

        buffer.update(0, &data).map_err(|e| self.log_and_return_error(e))?;

        if let Some(&index) = self.slot_names.get(name) {
            self.slots[index].changes.remove(ModuleChanges::UNIFORMS);
        }
        Ok(())
    }

    // ===== CHANGE TRACKING =====

    /// Pending changes of one module
    pub fn changes(&self, name: &str) -> ModuleChanges {
        self.slot(name)
            .map(|slot| slot.changes)
            .unwrap_or_default()
    }

    pub fn has_changes(&self) -> bool {
        self.slots.iter().any(|slot| !slot.changes.is_empty())
    }

    /// Take and clear pending changes, in registration order
    pub fn take_changes(&mut self) -> Vec<(String, ModuleChanges)> {
        self.slots
            .iter_mut()
            .filter(|slot| !slot.changes.is_empty())
            .map(|slot| (slot.name.clone(), std::mem::take(&mut slot.changes)))
            .collect()
    }

    // ===== DEBUG =====

    /// Flattened `"module.field"` view of every uniform value
    pub fn debug_table(&self) -> BTreeMap<String, DebugTableEntry> {
        let mut table = BTreeMap::new();
        for slot in &self.slots {
            for (field, value) in &slot.uniforms {
                let prop_type = slot.module.prop_type(field);
                table.insert(
                    format!("{}.{}", slot.name, field),
                    DebugTableEntry {
                        uniform_type: slot.module.uniform_type(field),
                        value: value.to_string(),
                        min: prop_type.and_then(|p| p.min),
                        max: prop_type.and_then(|p| p.max),
                    },
                );
            }
        }
        table
    }

    /// Dump the debug table to the logger at debug severity
    pub fn log_debug_table(&self) {
        for (key, entry) in self.debug_table() {
            inputs_debug!(self.logger, SOURCE, "{}: {}", key, entry);
        }
    }

    // ===== MODULES =====

    /// Registered modules in registration order, with their registration names
    pub fn modules(&self) -> impl Iterator<Item = (&str, &Arc<ShaderModule>)> + '_ {
        self.slots.iter().map(|slot| (slot.name.as_str(), &slot.module))
    }

    pub fn module(&self, name: &str) -> Option<&Arc<ShaderModule>> {
        self.slot(name).map(|slot| &slot.module)
    }

    pub fn module_count(&self) -> usize {
        self.slots.len()
    }

    pub fn binding_collision_policy(&self) -> BindingCollisionPolicy {
        self.binding_collisions
    }

    // ===== TEARDOWN =====

    /// Release all stored state
    ///
    /// Binding references are dropped; the GPU resources themselves belong
    /// to the backend and are not destroyed here.
    pub fn destroy(self) {
        inputs_debug!(
            self.logger,
            SOURCE,
            "Destroying ShaderInputs ({} modules)",
            self.slots.len()
        );
    }
}

fn warn(logger: &dyn Logger, source: &str, warning: Warning) {
    inputs_warn!(logger, source, "{}", warning);
}

#[cfg(test)]
#[path = "shader_inputs_tests.rs"]
mod tests;
