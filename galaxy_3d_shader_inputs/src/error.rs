//! Error and warning types for Galaxy3D shader inputs
//!
//! Hard failures are returned as `Error`. Soft conditions that the aggregator
//! recovers from locally are described by `Warning` and reported through the
//! injected logger instead of being returned.

use std::fmt;

/// Result type for shader input operations
pub type Result<T> = std::result::Result<T, Error>;

/// Shader input errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (buffer write failures, etc.)
    BackendError(String),

    /// The module dependency graph contains a cycle
    CyclicDependency {
        /// Module whose dependency closed the cycle
        module: String,
        /// Traversal chain from the first visited module back to `module`
        chain: Vec<String>,
    },

    /// A shader module definition is malformed
    InvalidModule(String),

    /// An operation targeted a module that is not registered
    UnknownModule(String),

    /// A stored uniform value does not match the declared uniform type
    UniformTypeMismatch {
        field: String,
        expected: String,
        found: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::CyclicDependency { module, chain } => write!(
                f,
                "Cyclic dependency on module '{}': {}",
                module,
                chain.join(" -> ")
            ),
            Error::InvalidModule(msg) => write!(f, "Invalid module: {}", msg),
            Error::UnknownModule(name) => write!(f, "Unknown module: {}", name),
            Error::UniformTypeMismatch { field, expected, found } => write!(
                f,
                "Uniform type mismatch for '{}': expected {}, found {}",
                field, expected, found
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Soft conditions reported through the logger (never returned)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// `set_props` targeted a module that is not registered
    UnknownModule { module: String },

    /// A module was registered under a key that differs from its declared name
    NameMismatch { key: String, declared: String },

    /// A module without a name was registered under an alias
    UnnamedModule { key: String },

    /// A dependency has no name, so its values could never be addressed
    UnnamedDependency,

    /// Two different module definitions competed for the same key
    ModuleConflict { name: String },

    /// A property value is neither a uniform nor a binding and was dropped
    UnclassifiableValue {
        module: String,
        field: String,
        kind: &'static str,
    },

    /// A stored uniform does not match its declared type and cannot be packed
    UniformTypeMismatch {
        module: String,
        field: String,
        expected: String,
        found: String,
    },

    /// Two modules declare a binding with the same name
    BindingCollision {
        binding: String,
        previous: String,
        winner: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownModule { module } => {
                write!(f, "Module '{}' not found, props ignored", module)
            }
            Warning::NameMismatch { key, declared } => {
                write!(f, "Module name: {} vs {}", key, declared)
            }
            Warning::UnnamedModule { key } => {
                write!(f, "Module registered as '{}' has no name", key)
            }
            Warning::UnnamedDependency => {
                write!(f, "Skipping unnamed dependency module")
            }
            Warning::ModuleConflict { name } => write!(
                f,
                "Conflicting definitions for module '{}'",
                name
            ),
            Warning::UnclassifiableValue { module, field, kind } => write!(
                f,
                "Dropping unclassifiable {} value '{}.{}'",
                kind, module, field
            ),
            Warning::UniformTypeMismatch {
                module,
                field,
                expected,
                found,
            } => write!(
                f,
                "Uniform '{}.{}' set to {}, declared {}",
                module, field, found, expected
            ),
            Warning::BindingCollision { binding, previous, winner } => write!(
                f,
                "Binding '{}' of module '{}' overridden by module '{}'",
                binding, previous, winner
            ),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
