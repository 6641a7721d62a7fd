/// Shader module dependency resolution
///
/// Expands a list of top-level modules into the flat, deduplicated list of
/// every module they transitively require. Dependencies come before the
/// modules that need them, and the first module seen under a name wins.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use super::module::ShaderModule;

/// Resolve the dependency closure of `modules`
///
/// Unnamed modules are deduplicated by identity, since they have no name to
/// be keyed by.
///
/// # Errors
///
/// `Error::CyclicDependency` if a module (transitively) depends on a module
/// with its own name.
pub fn resolve_module_dependencies(modules: &[Arc<ShaderModule>]) -> Result<Vec<Arc<ShaderModule>>> {
    let mut resolver = DependencyResolver::default();
    for module in modules {
        resolver.visit(module)?;
    }
    Ok(resolver.resolved)
}

#[derive(Default)]
struct DependencyResolver {
    resolved: Vec<Arc<ShaderModule>>,
    resolved_names: FxHashSet<String>,
    /// Modules on the current traversal path
    visiting: Vec<Arc<ShaderModule>>,
}

impl DependencyResolver {
    fn visit(&mut self, module: &Arc<ShaderModule>) -> Result<()> {
        if self.is_resolved(module) {
            return Ok(());
        }

        if let Some(start) = self.visiting.iter().position(|m| same_module(m, module)) {
            let mut chain: Vec<String> = self.visiting[start..]
                .iter()
                .map(|m| m.name().to_string())
                .collect();
            chain.push(module.name().to_string());
            return Err(Error::CyclicDependency {
                module: module.name().to_string(),
                chain,
            });
        }

        self.visiting.push(module.clone());
        for dependency in module.dependencies() {
            self.visit(dependency)?;
        }
        self.visiting.pop();

        if !module.name().is_empty() {
            self.resolved_names.insert(module.name().to_string());
        }
        self.resolved.push(module.clone());
        Ok(())
    }

    fn is_resolved(&self, module: &Arc<ShaderModule>) -> bool {
        if module.name().is_empty() {
            self.resolved.iter().any(|m| Arc::ptr_eq(m, module))
        } else {
            self.resolved_names.contains(module.name())
        }
    }
}

fn same_module(a: &Arc<ShaderModule>, b: &Arc<ShaderModule>) -> bool {
    Arc::ptr_eq(a, b) || (!a.name().is_empty() && a.name() == b.name())
}

#[cfg(test)]
#[path = "dependencies_tests.rs"]
mod tests;
