//! Integration tests for ShaderInputs
//!
//! These tests drive the public API the way a renderer would: build a
//! module set, feed prop updates, then upload uniforms and bind resources.
//! No GPU required.
//!
//! Run with: cargo test --test shader_inputs_integration_tests


use galaxy_3d_shader_inputs::galaxy3d::log::LogSeverity;
use galaxy_3d_shader_inputs::galaxy3d::render::{BufferUsage, SamplerType};
use galaxy_3d_shader_inputs::galaxy3d::shader::{
    Binding, BindingCollisionPolicy, ModuleChanges, ModuleUniformValues, PropType, PropertyBag,
    ShaderInputs, ShaderInputsDesc, ShaderModule, ShaderModuleDesc, ShaderValue, UniformDerivation,
    UniformType, UniformValue,
};
use galaxy_3d_shader_inputs::galaxy3d::Error;
use galaxy_3d_shader_inputs::glam::{Mat4, Vec3};
use galaxy_3d_shader_inputs::shader_props;
use std::collections::BTreeMap;
use std::sync::Arc;
use test_utils::{messages, sampler, texture, TestBuffer, TestLogger};

// ============================================================================
// MODULE LIBRARY
// ============================================================================

fn projection() -> Arc<ShaderModule> {
    Arc::new(
        ShaderModule::from_desc(ShaderModuleDesc {
            name: "project".to_string(),
            uniform_types: vec![
                ("view_projection".to_string(), UniformType::Mat4x4F32),
                ("camera_position".to_string(), UniformType::Vec3F32),
            ],
            default_uniforms: vec![
                ("view_projection".to_string(), Mat4::IDENTITY.into()),
                ("camera_position".to_string(), Vec3::ZERO.into()),
            ],
            ..Default::default()
        })
        .unwrap(),
    )
}

/// Lighting: expands a high-level "color" name into intensity and color uniforms
fn lighting(project: Arc<ShaderModule>) -> Arc<ShaderModule> {
    let derive = |props: &PropertyBag, _previous: &ModuleUniformValues| -> PropertyBag {
        let mut out = PropertyBag::new();
        for (key, value) in props {
            match (key.as_str(), value) {
                ("color", ShaderValue::Text(name)) => {
                    let rgb: [f32; 3] = match name.as_str() {
                        "warm" => [1.0, 0.8, 0.6],
                        "cold" => [0.6, 0.8, 1.0],
                        _ => [1.0, 1.0, 1.0],
                    };
                    out.insert("light_color".to_string(), ShaderValue::from(rgb));
                }
                _ => {
                    out.insert(key.clone(), value.clone());
                }
            }
        }
        out
    };

    Arc::new(
        ShaderModule::from_desc(ShaderModuleDesc {
            name: "lighting".to_string(),
            dependencies: vec![project],
            uniform_types: vec![
                ("light_color".to_string(), UniformType::Vec3F32),
                ("intensity".to_string(), UniformType::F32),
            ],
            prop_types: vec![("intensity".to_string(), PropType::with_range(1.0f32, 0.0, 10.0))],
            default_uniforms: vec![("light_color".to_string(), [1.0f32, 1.0, 1.0].into())],
            derivation: UniformDerivation::derived(derive),
        })
        .unwrap(),
    )
}

fn fog(project: Arc<ShaderModule>) -> Arc<ShaderModule> {
    Arc::new(
        ShaderModule::from_desc(ShaderModuleDesc {
            name: "fog".to_string(),
            dependencies: vec![project],
            uniform_types: vec![("density".to_string(), UniformType::F32)],
            default_uniforms: vec![("density".to_string(), UniformValue::Float(0.1))],
            ..Default::default()
        })
        .unwrap(),
    )
}

// ============================================================================
// PIPELINE TESTS
// ============================================================================

#[test]
fn test_integration_shared_dependency_resolved_once() {
    let project = projection();
    let inputs = ShaderInputs::new(&[lighting(project.clone()), fog(project)]).unwrap();

    let names: Vec<&str> = inputs.modules().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["lighting", "fog", "project"]);
    assert_eq!(
        inputs.uniform("project", "view_projection"),
        Some(&UniformValue::from(Mat4::IDENTITY))
    );
}

#[test]
fn test_integration_frame_loop() {
    let project = projection();
    let (logger, entries) = TestLogger::new();
    let desc = ShaderInputsDesc::from_modules(&[lighting(project.clone()), fog(project)])
        .with_logger(logger);
    let mut inputs = ShaderInputs::from_desc(desc).unwrap();

    // One uniform buffer per module, sized from its layout
    let buffers: BTreeMap<String, Arc<TestBuffer>> = inputs
        .modules()
        .map(|(name, _)| {
            let size = inputs.uniform_buffer_size(name).unwrap() as usize;
            (name.to_string(), TestBuffer::new(size, BufferUsage::Uniform))
        })
        .collect();

    let upload = |inputs: &mut ShaderInputs| {
        for (name, changes) in inputs.take_changes() {
            if changes.contains(ModuleChanges::UNIFORMS) {
                inputs.write_uniform_buffer(&name, &*buffers[&name]).unwrap();
            }
        }
    };

    // Frame 0: everything uploads once
    upload(&mut inputs);
    assert!(buffers.values().all(|b| b.write_count() == 1));
    assert_eq!(buffers["fog"].read_f32(0), 0.1);
    assert_eq!(buffers["lighting"].read_f32(12), 1.0);

    // Frame 1: only fog changes
    inputs.set_props([("fog", shader_props! { "density" => 0.5f32 })]);
    upload(&mut inputs);
    assert_eq!(buffers["fog"].write_count(), 2);
    assert_eq!(buffers["lighting"].write_count(), 1);
    assert_eq!(buffers["project"].write_count(), 1);
    assert_eq!(buffers["fog"].read_f32(0), 0.5);

    // Frame 2: derived lighting update, camera move, redundant fog update
    inputs.set_props([
        ("lighting", shader_props! { "color" => "warm", "intensity" => 2.5f32 }),
        ("project", shader_props! { "camera_position" => Vec3::new(0.0, 2.0, -5.0) }),
        ("fog", shader_props! { "density" => 0.5f32 }),
    ]);
    upload(&mut inputs);
    assert_eq!(buffers["fog"].write_count(), 2);
    assert_eq!(buffers["lighting"].write_count(), 2);
    assert_eq!(buffers["project"].write_count(), 2);
    assert_eq!(buffers["lighting"].read_f32(4), 0.8);
    assert_eq!(buffers["lighting"].read_f32(12), 2.5);
    assert_eq!(buffers["project"].read_f32(64 + 4), 2.0);

    assert!(messages(&entries, LogSeverity::Warn).is_empty());
    assert!(messages(&entries, LogSeverity::Error).is_empty());
}

#[test]
fn test_integration_bindings_for_draw() {
    let project = projection();
    let mut inputs = ShaderInputs::new(&[lighting(project.clone()), fog(project)]).unwrap();

    let shadow_map = texture(2048, 2048);
    let shadow_sampler = sampler(SamplerType::Shadow);
    let fog_noise = texture(256, 256);

    inputs.set_props([
        (
            "lighting",
            shader_props! {
                "shadow_map" => Binding::texture(shadow_map.clone()),
                "shadow_sampler" => Binding::sampler(shadow_sampler),
            },
        ),
        ("fog", shader_props! { "fog_noise" => Binding::texture(fog_noise) }),
    ]);

    let bindings = inputs.binding_values();
    let names: Vec<&str> = bindings.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["fog_noise", "shadow_map", "shadow_sampler"]);
    assert_eq!(bindings["shadow_map"].to_string(), "Texture(2048x2048 R8G8B8A8_SRGB)");
    assert_eq!(bindings["shadow_sampler"].to_string(), "Sampler(Shadow)");

    // Bindings never leak into uniform storage
    assert!(inputs.uniform("lighting", "shadow_map").is_none());

    drop(bindings);
    inputs.destroy();
    assert_eq!(Arc::strong_count(&shadow_map), 1);
}

#[test]
fn test_integration_collision_warning() {
    let (logger, entries) = TestLogger::new();
    let project = projection();
    let desc = ShaderInputsDesc::from_modules(&[lighting(project.clone()), fog(project)])
        .with_logger(logger)
        .with_binding_collisions(BindingCollisionPolicy::Warn);
    let mut inputs = ShaderInputs::from_desc(desc).unwrap();

    let storage = TestBuffer::new(64, BufferUsage::Storage);
    let fog_texture = texture(8, 8);
    inputs.set_props([
        ("lighting", shader_props! { "noise" => Binding::buffer(storage) }),
        ("fog", shader_props! { "noise" => Binding::texture(fog_texture.clone()) }),
    ]);

    let bindings = inputs.binding_values();
    assert_eq!(bindings["noise"], Binding::texture(fog_texture));
    assert_eq!(
        messages(&entries, LogSeverity::Warn),
        vec!["Binding 'noise' of module 'lighting' overridden by module 'fog'".to_string()]
    );
}

#[test]
fn test_integration_partial_failure_batch() {
    let (logger, entries) = TestLogger::new();
    let desc = ShaderInputsDesc::from_modules(&[fog(projection())]).with_logger(logger);
    let mut inputs = ShaderInputs::from_desc(desc).unwrap();

    inputs.set_props([
        ("bloom", shader_props! { "threshold" => 0.9f32 }),
        ("fog", shader_props! { "density" => 0.7f32 }),
    ]);

    assert_eq!(inputs.uniform("fog", "density"), Some(&UniformValue::Float(0.7)));
    assert_eq!(
        messages(&entries, LogSeverity::Warn),
        vec!["Module 'bloom' not found, props ignored".to_string()]
    );
}

#[test]
fn test_integration_cycle_is_construction_error() {
    let inner = Arc::new(
        ShaderModule::from_desc(ShaderModuleDesc {
            name: "outline".to_string(),
            ..Default::default()
        })
        .unwrap(),
    );
    let middle = Arc::new(
        ShaderModule::from_desc(ShaderModuleDesc {
            name: "edge".to_string(),
            dependencies: vec![inner],
            ..Default::default()
        })
        .unwrap(),
    );
    let outer = Arc::new(
        ShaderModule::from_desc(ShaderModuleDesc {
            name: "outline".to_string(),
            dependencies: vec![middle],
            ..Default::default()
        })
        .unwrap(),
    );

    let (logger, entries) = TestLogger::new();
    let result = ShaderInputs::from_desc(ShaderInputsDesc::from_modules(&[outer]).with_logger(logger));

    match result {
        Err(Error::CyclicDependency { module, chain }) => {
            assert_eq!(module, "outline");
            assert_eq!(chain, vec!["outline", "edge", "outline"]);
        }
        _ => panic!("expected a cyclic dependency error"),
    }
    let errors = messages(&entries, LogSeverity::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Cyclic dependency on module 'outline'"));
}

#[test]
fn test_integration_debug_table() {
    let project = projection();
    let mut inputs = ShaderInputs::new(&[lighting(project)]).unwrap();
    inputs.set_props([("lighting", shader_props! { "color" => "cold" })]);

    let table = inputs.debug_table();
    assert_eq!(table["lighting.light_color"].value, "0.6,0.8,1");
    assert_eq!(table["lighting.intensity"].uniform_type, Some(UniformType::F32));
    assert_eq!(table["lighting.intensity"].max, Some(10.0));
    assert_eq!(table["project.camera_position"].value, "0,0,0");
}
