//! Unit tests for error.rs
//!
//! Tests Error and Warning variants and their Display output.

use crate::error::{Error, Result, Warning};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("buffer write out of range".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("out of range"));
}

#[test]
fn test_cyclic_dependency_display() {
    let err = Error::CyclicDependency {
        module: "x".to_string(),
        chain: vec!["x".to_string(), "y".to_string(), "x".to_string()],
    };
    let display = format!("{}", err);
    assert!(display.contains("Cyclic dependency"));
    assert!(display.contains("'x'"));
    assert!(display.contains("x -> y -> x"));
}

#[test]
fn test_invalid_module_display() {
    let err = Error::InvalidModule("duplicate uniform 'radius'".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Invalid module"));
    assert!(display.contains("radius"));
}

#[test]
fn test_unknown_module_display() {
    let err = Error::UnknownModule("fog".to_string());
    assert_eq!(format!("{}", err), "Unknown module: fog");
}

#[test]
fn test_uniform_type_mismatch_display() {
    let err = Error::UniformTypeMismatch {
        field: "density".to_string(),
        expected: "f32".to_string(),
        found: "vec2<f32>".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "Uniform type mismatch for 'density': expected f32, found vec2<f32>"
    );
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::UnknownModule("a".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_clone_and_eq() {
    let err = Error::InvalidModule("bad".to_string());
    assert_eq!(err.clone(), err);
    assert_ne!(err, Error::UnknownModule("bad".to_string()));
}

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::UnknownModule("missing".to_string()))
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    assert_eq!(outer(), Err(Error::UnknownModule("missing".to_string())));
}

// ============================================================================
// WARNING DISPLAY TESTS
// ============================================================================

#[test]
fn test_warning_unknown_module_display() {
    let w = Warning::UnknownModule { module: "ghost".to_string() };
    assert!(format!("{}", w).contains("'ghost' not found"));
}

#[test]
fn test_warning_unnamed_dependency_display() {
    assert_eq!(
        Warning::UnnamedDependency.to_string(),
        "Skipping unnamed dependency module"
    );
}

#[test]
fn test_warning_uniform_type_mismatch_display() {
    let w = Warning::UniformTypeMismatch {
        module: "fog".to_string(),
        field: "density".to_string(),
        expected: "f32".to_string(),
        found: "i32".to_string(),
    };
    assert_eq!(w.to_string(), "Uniform 'fog.density' set to i32, declared f32");
}

#[test]
fn test_warning_name_mismatch_display() {
    let w = Warning::NameMismatch {
        key: "picking2".to_string(),
        declared: "picking".to_string(),
    };
    assert_eq!(format!("{}", w), "Module name: picking2 vs picking");
}

#[test]
fn test_warning_unclassifiable_display() {
    let w = Warning::UnclassifiableValue {
        module: "lighting".to_string(),
        field: "mode".to_string(),
        kind: "text",
    };
    let display = format!("{}", w);
    assert!(display.contains("text"));
    assert!(display.contains("lighting.mode"));
}

#[test]
fn test_warning_binding_collision_display() {
    let w = Warning::BindingCollision {
        binding: "texture".to_string(),
        previous: "a".to_string(),
        winner: "b".to_string(),
    };
    let display = format!("{}", w);
    assert!(display.contains("'texture'"));
    assert!(display.contains("'a'"));
    assert!(display.contains("'b'"));
}
