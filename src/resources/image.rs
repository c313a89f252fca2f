use uuid::Uuid;

/// CPU-side 8-bit RGBA image in sRGB encoding, as decoded from a glTF
/// material texture.
#[derive(Debug, Clone)]
pub struct Image {
    pub uuid: Uuid,
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, row-major.
    pub data: Vec<u8>,
}

impl Image {
    #[must_use]
    pub fn from_rgba8(name: &str, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            width,
            height,
            data,
        }
    }

    /// A single opaque white texel; sampling it leaves the base colour
    /// factor unchanged.
    #[must_use]
    pub fn white() -> Self {
        Self::from_rgba8("white", 1, 1, vec![255; 4])
    }

    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        wgpu::TextureFormat::Rgba8UnormSrgb
    }

    #[must_use]
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

/// Filtering and wrapping for one texture reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSampler {
    pub address_mode_u: wgpu::AddressMode,
    pub address_mode_v: wgpu::AddressMode,
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
}

impl Default for ImageSampler {
    fn default() -> Self {
        Self {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
        }
    }
}

/// An image plus the sampler it is read with.
#[derive(Debug, Clone)]
pub struct TextureMap {
    pub image: std::sync::Arc<Image>,
    pub sampler: ImageSampler,
}
