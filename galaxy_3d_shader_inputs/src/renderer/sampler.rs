/// Sampler trait and predefined sampler types

/// Predefined sampler configurations
///
/// Backends create (and usually cache) one GPU sampler per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerType {
    /// Linear filtering, repeat addressing
    LinearRepeat,
    /// Linear filtering, clamp-to-edge addressing
    LinearClamp,
    /// Nearest filtering, repeat addressing
    NearestRepeat,
    /// Nearest filtering, clamp-to-edge addressing
    NearestClamp,
    /// Depth comparison sampler for shadow maps
    Shadow,
    /// Anisotropic filtering, repeat addressing
    Anisotropic,
}

/// Sampler resource trait
///
/// Implemented by backend-specific sampler objects.
pub trait Sampler: Send + Sync {
    /// The configuration this sampler was created from
    fn sampler_type(&self) -> SamplerType;
}
