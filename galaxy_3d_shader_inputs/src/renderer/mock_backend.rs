/// Mock backend resources for unit tests (no GPU required)
///
/// These stand in for the textures, samplers and buffers a real backend
/// would create, so bindings can be exercised without a device.

use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::renderer::{Buffer, BufferUsage, Sampler, SamplerType, Texture, TextureFormat, TextureInfo};

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
    pub name: String,
}

impl MockTexture {
    pub fn new(width: u32, height: u32, name: &str) -> Self {
        Self {
            info: TextureInfo {
                width,
                height,
                format: TextureFormat::R8G8B8A8_UNORM,
            },
            name: name.to_string(),
        }
    }

    pub fn shared(name: &str) -> Arc<Self> {
        Arc::new(Self::new(64, 64, name))
    }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

// ============================================================================
// Mock Sampler
// ============================================================================

#[derive(Debug)]
pub struct MockSampler {
    pub sampler_type: SamplerType,
}

impl MockSampler {
    pub fn shared(sampler_type: SamplerType) -> Arc<Self> {
        Arc::new(Self { sampler_type })
    }
}

impl Sampler for MockSampler {
    fn sampler_type(&self) -> SamplerType {
        self.sampler_type
    }
}

// ============================================================================
// Mock Buffer
// ============================================================================

/// Buffer backed by host memory; writes are recorded for inspection
#[derive(Debug)]
pub struct MockBuffer {
    pub usage: BufferUsage,
    pub data: Mutex<Vec<u8>>,
}

impl MockBuffer {
    pub fn new(size: u64, usage: BufferUsage) -> Self {
        Self {
            usage,
            data: Mutex::new(vec![0u8; size as usize]),
        }
    }

    pub fn shared(size: u64, usage: BufferUsage) -> Arc<Self> {
        Arc::new(Self::new(size, usage))
    }

    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().unwrap().clone()
    }
}

impl Buffer for MockBuffer {
    fn size(&self) -> u64 {
        self.data.lock().unwrap().len() as u64
    }

    fn usage(&self) -> BufferUsage {
        self.usage
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        let mut storage = self.data.lock().unwrap();
        let start = offset as usize;
        let end = start + data.len();
        if end > storage.len() {
            return Err(Error::BackendError(format!(
                "write of {} bytes at offset {} exceeds buffer size {}",
                data.len(),
                offset,
                storage.len()
            )));
        }
        storage[start..end].copy_from_slice(data);
        Ok(())
    }
}
